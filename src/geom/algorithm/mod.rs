mod distance;
mod simplify;

pub(crate) use distance::within_distance;
pub(crate) use simplify::{clean_multipolygon, simplify_multipolygon};
