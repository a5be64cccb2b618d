pub use shared::{
    ApiError, Coordinate, SegmentRequest, SegmentResponse, TravelMode, Waypoint,
};
