mod tax_bracket;
mod tax_result;
mod tax_schedule;

pub use tax_bracket::TaxBracket;
pub use tax_result::{BandTax, TaxResult};
pub use tax_schedule::{ScheduleError, TaxSchedule, validate_brackets};
