mod rules;
mod table;

pub use rules::{
    day_mask_parts, digits, is_identifier, is_postcode, is_valid_masking, mask, parse_plain_date,
    plain_date_ok, visible_prefix, MaskedField,
};
pub use table::{mode_for, MaskMode, POLICY};
