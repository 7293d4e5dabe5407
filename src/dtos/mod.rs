pub mod enquirydtos;
