pub mod exception;
pub mod https;
pub mod routing;
