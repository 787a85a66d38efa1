use proptest::prelude::*;

/// Strategy for template literal text without placeholder markers
pub fn literal_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9 .=/-]{0,20}"
}

/// Strategy for valid placeholder names
pub fn variable_name_strategy() -> impl Strategy<Value = String> {
    "[a-z_][a-z0-9_]{0,7}"
}

/// Strategy for ascending `start-end` range bounds
pub fn ascending_bounds_strategy() -> impl Strategy<Value = (u64, u64)> {
    (0u64..10_000, 0u64..50).prop_map(|(start, width)| (start, start + width))
}

/// Strategy for value lists bound to a variable
pub fn value_list_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z0-9-]{1,8}", 0..4)
}
