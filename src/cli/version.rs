use std::env::consts::{ARCH, OS};

use crate::cnf::{PKG_NAME, PKG_VERSION};
use crate::err::Error;

pub fn init() -> Result<(), Error> {
	println!("{} {} for {} on {}", PKG_NAME, *PKG_VERSION, OS, ARCH);
	Ok(())
}
