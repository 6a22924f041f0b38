//! Унифицированные трэйты чтения/записи таблиц поверх std::io.

use crate::{
    error::Result,
    model::{Account, BatchRun},
};
use std::io::{Read, Seek, Write};

pub trait ReadAccounts {
    fn read<R: Read + Seek>(r: R) -> Result<Vec<Account>>;
}

pub trait WriteAccounts {
    fn write<W: Write + Seek + Send>(w: W, accounts: &[Account]) -> Result<()>;
}

pub trait AccountTable: ReadAccounts + WriteAccounts {}
impl<T: ReadAccounts + WriteAccounts> AccountTable for T {}

pub trait WriteReport {
    fn write<W: Write + Seek + Send>(w: W, run: &BatchRun) -> Result<()>;
}
