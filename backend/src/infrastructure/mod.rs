pub mod chord_sheet;
