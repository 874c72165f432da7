#[macro_use]
extern crate log;

pub mod api;
pub mod coordinates;
pub mod formatter;
pub mod logs;
pub mod track_document;
pub mod trimmer;
pub mod xml_doc;
