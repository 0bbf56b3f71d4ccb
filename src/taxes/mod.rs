// 💸 Taxes - shared tax flow plus per-country specializations

pub mod d8;
pub mod jp;
pub mod processor;
pub mod tax;
pub mod us;

pub use processor::{calculator_for, TaxProcessor};
pub use tax::{
    do_tax_round, tax_create, FarePath, FareUsage, GenericTax, TaxCalculation, TaxCalculator, TaxItem,
    TaxResponse,
};
