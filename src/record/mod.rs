mod customer;
mod export_row;

pub use customer::{
    Address, AddressList, Channel, CustomerRecord, FieldKind, Gender, Observed, ValueForm,
};
pub use export_row::{export_headers, ExportRow, ADDRESS_GROUPS};
