/// Core value type.
///
/// Defines the `Value` enum carried by operations at run time, together with
/// its total order (numbers compare numerically across integer and real
/// representations) and conversions into indices and weights.
pub mod core;
