use std::fs::File;
use std::io::prelude::*;
use std::path::Path;

use log::info;

use crate::error::VmError;

/// A raw program image. Fit against the program space is checked when the
/// image is copied into machine memory, not here.
#[derive(Debug, Default)]
pub struct Rom {
    pub bytes: Vec<u8>,
}

impl Rom {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, VmError> {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                VmError::ResourceNotFound {
                    path: path.display().to_string(),
                }
            } else {
                VmError::Io(err)
            }
        })?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        info!("read {} bytes from {}", bytes.len(), path.display());
        Ok(Rom { bytes })
    }
}
