pub mod cpu;
pub mod decode;
pub mod machine;
pub mod rom;
