pub mod archive;
pub mod backup;
pub mod checkin;
pub mod del;
pub mod documents;
pub mod family_note;
pub mod log;
pub mod permission_pdf;
pub mod report;
pub mod snapshot;
