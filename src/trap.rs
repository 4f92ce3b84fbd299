use crate::console::Console;
use crate::cpu::{CycleResult, CPU};
use crate::errors::VmError;
use crate::register::R;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use std::convert::{TryFrom, TryInto};

#[derive(Debug, FromPrimitive)]
#[repr(u16)]
pub enum TrapCode {
    GETC = 0x20,
    OUT = 0x21,
    PUTS = 0x22,
    IN = 0x23,
    PUTSP = 0x24,
    HALT = 0x25,
}

impl TryFrom<u16> for TrapCode {
    type Error = VmError;

    fn try_from(val: u16) -> Result<Self, Self::Error> {
        TrapCode::from_u16(val).ok_or(VmError::UnknownTrap(val))
    }
}

const IN_PROMPT: &str = "Enter a character: ";
const HALT_BANNER: &str = "\n-- HALT --\n";

impl<C: Console> CPU<C> {
    pub(crate) fn mnemonic_trap(&mut self, args: u16) -> CycleResult {
        // R7 takes the post-incremented PC, like JSR.
        self.register.write(R::_7, self.register.read(R::PC));

        let code: TrapCode = (args & 0xff).try_into()?;
        match code {
            TrapCode::GETC => self.trap_getc(),
            TrapCode::OUT => self.trap_out(),
            TrapCode::PUTS => self.trap_puts(),
            TrapCode::IN => self.trap_in(),
            TrapCode::PUTSP => self.trap_putsp(),
            TrapCode::HALT => self.trap_halt(),
        }
    }

    fn trap_getc(&mut self) -> CycleResult {
        let c = self.console.read_byte()?;
        self.register.write(R::_0, u16::from(c));
        self.register.update_flag(R::_0);
        Ok(())
    }

    fn trap_out(&mut self) -> CycleResult {
        let byte = self.register.read(R::_0) as u8;
        self.console.write_byte(byte)?;
        self.console.flush()?;
        Ok(())
    }

    fn trap_puts(&mut self) -> CycleResult {
        let mut addr = self.register.read(R::_0);
        loop {
            let word = self.mem_read(addr)?;
            if word == 0 {
                break;
            }
            self.console.write_byte(word as u8)?;
            addr = addr.wrapping_add(1);
        }
        self.console.flush()?;
        Ok(())
    }

    fn trap_in(&mut self) -> CycleResult {
        self.console.write_str(IN_PROMPT)?;
        self.console.flush()?;

        let c = self.console.read_byte()?;
        self.console.write_byte(c)?;
        self.console.write_byte(b'\n')?;
        self.console.flush()?;

        self.register.write(R::_0, u16::from(c));
        self.register.update_flag(R::_0);
        Ok(())
    }

    // Two packed characters per word, low byte first. A zero high byte
    // ends the word but not the string.
    fn trap_putsp(&mut self) -> CycleResult {
        let mut addr = self.register.read(R::_0);
        loop {
            let word = self.mem_read(addr)?;
            if word == 0 {
                break;
            }
            self.console.write_byte(word as u8)?;
            let high = (word >> 8) as u8;
            if high != 0 {
                self.console.write_byte(high)?;
            }
            addr = addr.wrapping_add(1);
        }
        self.console.flush()?;
        Ok(())
    }

    fn trap_halt(&mut self) -> CycleResult {
        log::debug!("halt at x{:04X}", self.register.read(R::PC));
        self.console.write_str(HALT_BANNER)?;
        self.console.flush()?;
        self.halt();
        Ok(())
    }
}
