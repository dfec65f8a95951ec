use crate::core::io::traits::TrajectoryFile;
use crate::core::models::frame::Frame;
use crate::core::models::units::FrameUnits;
use nalgebra::Vector3;
use std::io::{self, BufRead, Read};
use thiserror::Error;

const TRR_MAGIC: i32 = 1993;
const TRR_VERSION: &str = "GMX_trn_file";
const MAX_PREALLOCATED_ATOMS: usize = 4096;

#[derive(Debug, Error)]
pub enum TrrError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Bad magic number {found} at byte {offset} (expected {TRR_MAGIC})")]
    BadMagic { found: i32, offset: u64 },
    #[error("Invalid frame header at byte {offset}: {reason}")]
    Header { offset: u64, reason: String },
    #[error("File ends in the middle of a frame (byte {offset})")]
    Truncated { offset: u64 },
}

/// GROMACS full-precision trajectory (`.trr`), an XDR (big-endian) stream of
/// frames each carrying optional box, virial, pressure, positions, velocities
/// and forces, in single or double precision.
pub struct TrrFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Precision {
    Single,
    Double,
}

impl Precision {
    fn bytes(self) -> usize {
        match self {
            Precision::Single => 4,
            Precision::Double => 8,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct FrameHeader {
    box_size: usize,
    vir_size: usize,
    pres_size: usize,
    x_size: usize,
    v_size: usize,
    f_size: usize,
    natoms: usize,
    step: i64,
    precision: Precision,
}

struct XdrReader<R: Read> {
    inner: R,
    offset: u64,
}

impl<R: Read> XdrReader<R> {
    fn new(inner: R) -> Self {
        Self { inner, offset: 0 }
    }

    /// Fills `buf`, reporting how many bytes were available before EOF.
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize, TrrError> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        self.offset += filled as u64;
        Ok(filled)
    }

    fn read_exact_or_truncated(&mut self, buf: &mut [u8]) -> Result<(), TrrError> {
        if self.fill(buf)? < buf.len() {
            return Err(TrrError::Truncated {
                offset: self.offset,
            });
        }
        Ok(())
    }

    /// Reads the leading integer of a frame, or `None` at a clean end of stream.
    fn try_read_i32(&mut self) -> Result<Option<i32>, TrrError> {
        let mut buf = [0u8; 4];
        match self.fill(&mut buf)? {
            0 => Ok(None),
            4 => Ok(Some(i32::from_be_bytes(buf))),
            _ => Err(TrrError::Truncated {
                offset: self.offset,
            }),
        }
    }

    fn read_i32(&mut self) -> Result<i32, TrrError> {
        let mut buf = [0u8; 4];
        self.read_exact_or_truncated(&mut buf)?;
        Ok(i32::from_be_bytes(buf))
    }

    fn read_real(&mut self, precision: Precision) -> Result<f64, TrrError> {
        match precision {
            Precision::Single => {
                let mut buf = [0u8; 4];
                self.read_exact_or_truncated(&mut buf)?;
                Ok(f32::from_be_bytes(buf) as f64)
            }
            Precision::Double => {
                let mut buf = [0u8; 8];
                self.read_exact_or_truncated(&mut buf)?;
                Ok(f64::from_be_bytes(buf))
            }
        }
    }

    /// XDR opaque string: length word followed by bytes padded to a 4-byte boundary.
    fn read_string(&mut self) -> Result<String, TrrError> {
        let offset = self.offset;
        let len = self.read_i32()?;
        let len = usize::try_from(len).map_err(|_| TrrError::Header {
            offset,
            reason: format!("negative string length {}", len),
        })?;
        let padded = len.div_ceil(4) * 4;
        let mut buf = Vec::new();
        let read = (&mut self.inner).take(padded as u64).read_to_end(&mut buf)?;
        self.offset += read as u64;
        if read < padded {
            return Err(TrrError::Truncated {
                offset: self.offset,
            });
        }
        buf.truncate(len);
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    fn skip(&mut self, bytes: usize) -> Result<(), TrrError> {
        let copied = io::copy(&mut (&mut self.inner).take(bytes as u64), &mut io::sink())?;
        self.offset += copied;
        if copied < bytes as u64 {
            return Err(TrrError::Truncated {
                offset: self.offset,
            });
        }
        Ok(())
    }

    fn read_vectors(
        &mut self,
        count: usize,
        precision: Precision,
    ) -> Result<Vec<Vector3<f64>>, TrrError> {
        let mut out = Vec::with_capacity(count.min(MAX_PREALLOCATED_ATOMS));
        for _ in 0..count {
            let x = self.read_real(precision)?;
            let y = self.read_real(precision)?;
            let z = self.read_real(precision)?;
            out.push(Vector3::new(x, y, z));
        }
        Ok(out)
    }
}

fn to_size(value: i32, name: &str, offset: u64) -> Result<usize, TrrError> {
    usize::try_from(value).map_err(|_| TrrError::Header {
        offset,
        reason: format!("negative {} ({})", name, value),
    })
}

impl TrrFile {
    fn read_header<R: Read>(
        xdr: &mut XdrReader<R>,
        magic: i32,
    ) -> Result<(FrameHeader, f64), TrrError> {
        let offset = xdr.offset - 4;
        if magic != TRR_MAGIC {
            return Err(TrrError::BadMagic {
                found: magic,
                offset,
            });
        }
        // Declared length of the version string including its NUL terminator.
        xdr.read_i32()?;
        let version = xdr.read_string()?;
        if version != TRR_VERSION {
            return Err(TrrError::Header {
                offset,
                reason: format!("unknown version string '{}'", version),
            });
        }

        let mut sizes = [0i32; 13];
        for size in &mut sizes {
            *size = xdr.read_i32()?;
        }
        let [ir, e, bx, vir, pres, top, sym, x, v, f, natoms, step, _nre] = sizes;
        if ir != 0 || e != 0 || top != 0 || sym != 0 {
            return Err(TrrError::Header {
                offset,
                reason: "input-record, energy, topology and symbol blocks are not supported"
                    .into(),
            });
        }

        let natoms = to_size(natoms, "atom count", offset)?;
        let box_size = to_size(bx, "box size", offset)?;
        let vir_size = to_size(vir, "virial size", offset)?;
        let pres_size = to_size(pres, "pressure size", offset)?;
        let x_size = to_size(x, "position block size", offset)?;
        let v_size = to_size(v, "velocity block size", offset)?;
        let f_size = to_size(f, "force block size", offset)?;

        let real_bytes = if box_size != 0 {
            box_size / 9
        } else if natoms != 0 && x_size != 0 {
            x_size / (3 * natoms)
        } else if natoms != 0 && v_size != 0 {
            v_size / (3 * natoms)
        } else if natoms != 0 && f_size != 0 {
            f_size / (3 * natoms)
        } else {
            4
        };
        let precision = match real_bytes {
            4 => Precision::Single,
            8 => Precision::Double,
            other => {
                return Err(TrrError::Header {
                    offset,
                    reason: format!("cannot infer precision (real size {})", other),
                });
            }
        };

        let vector_block = 3 * natoms * precision.bytes();
        for (size, name) in [(x_size, "position"), (v_size, "velocity"), (f_size, "force")] {
            if size != 0 && size != vector_block {
                return Err(TrrError::Header {
                    offset,
                    reason: format!(
                        "{} block is {} bytes, expected {} for {} atoms",
                        name, size, vector_block, natoms
                    ),
                });
            }
        }

        let time = xdr.read_real(precision)?;
        // lambda
        xdr.read_real(precision)?;

        Ok((
            FrameHeader {
                box_size,
                vir_size,
                pres_size,
                x_size,
                v_size,
                f_size,
                natoms,
                step: step as i64,
                precision,
            },
            time,
        ))
    }

    fn read_frame<R: Read>(xdr: &mut XdrReader<R>) -> Result<Option<Frame>, TrrError> {
        let Some(magic) = xdr.try_read_i32()? else {
            return Ok(None);
        };
        let (header, time) = Self::read_header(xdr, magic)?;

        xdr.skip(header.box_size + header.vir_size + header.pres_size)?;
        let positions = if header.x_size != 0 {
            xdr.read_vectors(header.natoms, header.precision)?
        } else {
            Vec::new()
        };
        let velocities = if header.v_size != 0 {
            Some(xdr.read_vectors(header.natoms, header.precision)?)
        } else {
            None
        };
        xdr.skip(header.f_size)?;

        Ok(Some(Frame {
            step: Some(header.step),
            time: Some(time),
            positions,
            velocities,
            units: Self::NATIVE_UNITS,
        }))
    }
}

impl TrajectoryFile for TrrFile {
    type Error = TrrError;

    const NATIVE_UNITS: FrameUnits = FrameUnits::NANOMETER_PICOSECOND;

    fn read_last_frame_from(reader: &mut impl BufRead) -> Result<Option<Frame>, Self::Error> {
        let mut xdr = XdrReader::new(reader);
        let mut last = None;
        while let Some(frame) = Self::read_frame(&mut xdr)? {
            last = Some(frame);
        }
        Ok(last)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    /// Serializes frames in the `.trr` layout, for fabricating test trajectories.
    pub struct TrrWriter {
        pub bytes: Vec<u8>,
        pub double: bool,
    }

    impl TrrWriter {
        pub fn new(double: bool) -> Self {
            Self {
                bytes: Vec::new(),
                double,
            }
        }

        fn int(&mut self, v: i32) {
            self.bytes.extend_from_slice(&v.to_be_bytes());
        }

        fn real(&mut self, v: f64) {
            if self.double {
                self.bytes.extend_from_slice(&v.to_be_bytes());
            } else {
                self.bytes.extend_from_slice(&(v as f32).to_be_bytes());
            }
        }

        pub fn frame(
            &mut self,
            step: i32,
            time: f64,
            x: Option<&[[f64; 3]]>,
            v: Option<&[[f64; 3]]>,
        ) -> &mut Self {
            let natoms = x.or(v).map_or(0, |a| a.len());
            let real = if self.double { 8 } else { 4 };
            let block = (3 * natoms * real) as i32;

            self.int(1993);
            self.int(13);
            self.int(12);
            self.bytes.extend_from_slice(b"GMX_trn_file");
            // ir, e, box, vir, pres, top, sym
            for size in [0, 0, 9 * real as i32, 0, 0, 0, 0] {
                self.int(size);
            }
            self.int(if x.is_some() { block } else { 0 });
            self.int(if v.is_some() { block } else { 0 });
            self.int(0);
            self.int(natoms as i32);
            self.int(step);
            self.int(0);
            self.real(time);
            self.real(0.0);
            for i in 0..9 {
                self.real(if i % 4 == 0 { 5.0 } else { 0.0 });
            }
            for block in [x, v].into_iter().flatten() {
                for atom in block {
                    for c in atom {
                        self.real(*c);
                    }
                }
            }
            self
        }
    }
}
