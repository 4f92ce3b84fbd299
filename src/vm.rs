use crate::console::Console;
use crate::cpu::CPU;
use crate::errors::VmError;
use crate::memory::{Memory, MEMORY_WORDS};
use byteorder::{BigEndian, ReadBytesExt};
use clap::Parser;
use log::debug;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

pub const PC_START: u16 = 0x3000;

#[derive(Debug, Parser)]
#[command(name = "lc3vm")]
#[command(about = "LC-3 virtual machine", long_about = None)]
pub struct Args {
    /// Program images, loaded in order at each image's own origin
    #[arg(required = true, value_name = "IMAGE")]
    pub images: Vec<PathBuf>,
}

#[derive(Debug)]
pub struct VM<C: Console> {
    pub(crate) cpu: CPU<C>,
}

impl<C: Console> VM<C> {
    pub fn boot(args: &Args, console: C) -> Result<Self, VmError> {
        let mut cpu = CPU::new(console);

        for path in &args.images {
            load_image_file(&mut cpu, path)?;
        }

        cpu.start(PC_START);
        Ok(VM { cpu })
    }

    pub fn is_running(&self) -> bool {
        self.cpu.is_running()
    }

    pub fn next(&mut self) -> Result<(), VmError> {
        self.cpu.tick()
    }

    pub fn abort(&mut self) {
        self.cpu.halt();
    }
}

pub fn load_image_file<C: Console>(cpu: &mut CPU<C>, path: &Path) -> Result<(), VmError> {
    let into_load_error = |source: io::Error| VmError::ImageLoad {
        path: path.display().to_string(),
        source,
    };

    let file = File::open(path).map_err(into_load_error)?;
    let (origin, words) =
        load_image(&mut cpu.memory, BufReader::new(file)).map_err(into_load_error)?;

    debug!("loaded {} words at x{:04X} from {}", words, origin, path.display());
    Ok(())
}

/// The first big-endian word is the origin; the rest is loaded
/// contiguously from there, truncated at the top of memory.
pub fn load_image<R: Read>(mem: &mut Memory, mut reader: R) -> io::Result<(u16, usize)> {
    let origin = reader.read_u16::<BigEndian>()?;

    let mut addr = origin as usize;
    while addr < MEMORY_WORDS {
        match reader.read_u16::<BigEndian>() {
            Ok(word) => {
                mem.write(addr as u16, word);
                addr += 1;
            }
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e),
        }
    }

    Ok((origin, addr - origin as usize))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::testing::ScriptedConsole;
    use std::io::Cursor;

    fn image(origin: u16, words: &[u16]) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(2 + words.len() * 2);
        bytes.extend_from_slice(&origin.to_be_bytes());
        for word in words {
            bytes.extend_from_slice(&word.to_be_bytes());
        }
        bytes
    }

    fn read(mem: &mut Memory, addr: u16) -> u16 {
        let mut console = ScriptedConsole::new();
        mem.read(addr, &mut console).unwrap()
    }

    #[test]
    fn loads_big_endian_words_at_the_origin() {
        let mut mem = Memory::new();
        let bytes = image(0x3000, &[0xf2f3, 0xf4f5, 0xf6f7]);

        let (origin, words) = load_image(&mut mem, Cursor::new(bytes)).unwrap();

        assert_eq!(origin, 0x3000);
        assert_eq!(words, 3);
        assert_eq!(read(&mut mem, 0x3000), 0xf2f3);
        assert_eq!(read(&mut mem, 0x3001), 0xf4f5);
        assert_eq!(read(&mut mem, 0x3002), 0xf6f7);
    }

    #[test]
    fn later_images_overwrite_earlier_ones() {
        let mut mem = Memory::new();
        load_image(&mut mem, Cursor::new(image(0x3000, &[0x1111, 0x2222]))).unwrap();
        load_image(&mut mem, Cursor::new(image(0x3001, &[0x3333]))).unwrap();

        assert_eq!(read(&mut mem, 0x3000), 0x1111);
        assert_eq!(read(&mut mem, 0x3001), 0x3333);
    }

    #[test]
    fn truncates_at_the_top_of_memory() {
        let mut mem = Memory::new();
        let (origin, words) =
            load_image(&mut mem, Cursor::new(image(0xffff, &[0xaaaa, 0xbbbb, 0xcccc]))).unwrap();

        assert_eq!(origin, 0xffff);
        assert_eq!(words, 1);
        assert_eq!(read(&mut mem, 0xffff), 0xaaaa);
        assert_eq!(read(&mut mem, 0x0000), 0);
    }

    #[test]
    fn trailing_odd_byte_is_dropped() {
        let mut mem = Memory::new();
        let mut bytes = image(0x3000, &[0x1234]);
        bytes.push(0xab);

        let (_, words) = load_image(&mut mem, Cursor::new(bytes)).unwrap();

        assert_eq!(words, 1);
        assert_eq!(read(&mut mem, 0x3000), 0x1234);
        assert_eq!(read(&mut mem, 0x3001), 0);
    }

    #[test]
    fn boot_loads_images_and_starts_at_0x3000() {
        let path = std::env::temp_dir().join(format!("lc3vm-boot-{}.obj", std::process::id()));
        std::fs::write(&path, image(0x3000, &[0xf025])).unwrap();

        let args = Args {
            images: vec![path.clone()],
        };
        let mut vm = VM::boot(&args, ScriptedConsole::new()).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(vm.is_running());
        assert_eq!(vm.cpu.reg_load(crate::register::R::PC), PC_START);

        vm.next().unwrap(); // HALT
        assert!(!vm.is_running());
    }

    #[test]
    fn boot_reports_a_missing_image() {
        let args = Args {
            images: vec![PathBuf::from("/no/such/image.obj")],
        };

        let err = VM::boot(&args, ScriptedConsole::new()).unwrap_err();
        match err {
            VmError::ImageLoad { path, .. } => assert!(path.contains("image.obj")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
