use crate::errors::VmError;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use std::convert::{TryFrom, TryInto};

#[derive(Clone, Copy, Debug, PartialEq, FromPrimitive)]
#[repr(u16)]
pub enum R {
    _0,
    _1,
    _2,
    _3,
    _4,
    _5,
    _6,
    _7,
    PC,
    COND,
}

impl TryFrom<u16> for R {
    type Error = VmError;

    fn try_from(val: u16) -> Result<Self, Self::Error> {
        R::from_u16(val).ok_or(VmError::BadRegister(val))
    }
}

#[derive(Clone, Copy, Debug, FromPrimitive, PartialEq)]
#[repr(u16)]
pub enum Flag {
    Positive = 1 << 0,
    Zero = 1 << 1,
    Negative = 1 << 2,
}

impl TryFrom<u16> for Flag {
    type Error = VmError;

    fn try_from(val: u16) -> Result<Self, Self::Error> {
        Flag::from_u16(val).ok_or(VmError::BadFlag(val))
    }
}

#[derive(Debug)]
pub struct Register([u16; 10]);

impl Register {
    pub fn new() -> Self {
        let mut reg = Register([0; 10]);
        reg.set_flag(Flag::Zero);
        reg
    }

    pub fn write(&mut self, r: R, val: u16) {
        self.0[r as usize] = val;
    }

    pub fn read(&self, r: R) -> u16 {
        self.0[r as usize]
    }

    pub fn read_incr(&mut self, r: R) -> u16 {
        let val = self.read(r);
        self.incr(r);
        val
    }

    pub fn update_flag(&mut self, r: R) {
        match self.0[r as usize] {
            0 => self.set_flag(Flag::Zero),
            x if x >> 15 == 1 => self.set_flag(Flag::Negative),
            _ => self.set_flag(Flag::Positive),
        }
    }

    // COND is one-hot, so the flag value is the whole register.
    pub fn set_flag(&mut self, f: Flag) {
        self.write(R::COND, f as u16);
    }

    pub fn get_flag(&self) -> Result<Flag, VmError> {
        self.read(R::COND).try_into()
    }

    pub fn incr(&mut self, r: R) {
        self.write(r, self.read(r).wrapping_add(1));
    }
}

impl Default for Register {
    fn default() -> Self {
        Register::new()
    }
}
