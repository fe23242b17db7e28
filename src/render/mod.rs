pub mod blur;
pub mod cpu;
pub mod frame;
