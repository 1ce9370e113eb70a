pub mod connect;
pub mod coverage;
pub mod depth;
pub mod error;
pub mod gc;
pub mod gtf;
pub mod interval;
pub mod io;
pub mod last;
pub mod psl;
pub mod select;
pub mod sweep;
