//! The processor: register file, status registers, exception model and the
//! two execution engines.

#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_possible_wrap)]
#[allow(clippy::cast_sign_loss)]
pub mod arithmetic;

pub mod arm;

#[allow(clippy::cast_lossless)]
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::module_name_repetitions)]
pub mod arm7tdmi;
pub mod condition;
pub mod cpu_modes;
pub mod exception;

#[allow(clippy::cast_possible_truncation)]
pub mod flags;
pub mod psr;
pub mod register_bank;

#[allow(clippy::cast_possible_wrap)]
#[allow(clippy::cast_sign_loss)]
pub mod registers;
pub mod thumb;
