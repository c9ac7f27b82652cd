pub mod assembler;
pub mod extractor;
pub mod loader;
pub mod types;
pub mod utils;

pub use assembler::{convert_raw_to_matrix, convert_with_layout, BlockSpec, SheetLayout};
pub use extractor::{extract_block, extract_years, extract_years_at};
pub use loader::{read_excel_bytes_sheet, read_excel_file_sheet};
pub use types::{CellValue, RawGrid, WideRecord, WideTable, YearSequence};
