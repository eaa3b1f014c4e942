/// Request outcome logging.
pub mod logging;
