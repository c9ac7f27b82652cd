pub mod analysis;
pub mod excel;
pub mod pipeline;
pub mod reshaper;
pub mod writer;
