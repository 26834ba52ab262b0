/// checked opening, reading and creation of the files every stage works on
pub mod load_from_file;
/// word wrapping of the plain-text reports
pub mod text_report;
