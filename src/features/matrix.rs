use crate::error::{GenespaceError, Result};
use crate::features::native::FloatType;
use crate::types::{Code, Gene, MappedValue};
use rand::RngCore;

/// A fixed `rows x cols` block of bounded floats, stored row-major in the
/// flat vector.
///
/// A square matrix doubles as an adjacency-shaped code: its length is a
/// perfect square, which is all a graph-flavored consumer checks for.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixType {
    rows: usize,
    cols: usize,
    element: FloatType,
}

impl MatrixType {
    pub fn new(rows: usize, cols: usize, lower: f64, upper: f64) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(GenespaceError::Configuration(format!(
                "matrix dimensions must be positive, got {}x{}",
                rows, cols
            )));
        }
        Ok(Self {
            rows,
            cols,
            element: FloatType::new(lower, upper)?,
        })
    }

    /// Square matrix over `nodes` items, e.g. an adjacency weight block.
    pub fn square(nodes: usize, lower: f64, upper: f64) -> Result<Self> {
        Self::new(nodes, nodes, lower, upper)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn size(&self) -> usize {
        self.rows * self.cols
    }

    pub fn sample_random(&self, rng: &mut dyn RngCore) -> Code {
        let mut code = Vec::with_capacity(self.size());
        for _ in 0..self.size() {
            code.extend(self.element.sample_random(rng));
        }
        code
    }

    pub fn mutate_random(&self, code: &mut [Gene], rng: &mut dyn RngCore) -> Result<()> {
        if code.len() != self.size() {
            return Err(GenespaceError::Shape {
                expected: self.size(),
                actual: code.len(),
            });
        }
        for slot in code.chunks_mut(1) {
            self.element.mutate_random(slot, rng)?;
        }
        Ok(())
    }

    pub fn fits(&self, code: &[Gene]) -> bool {
        code.len() == self.size() && code.chunks(1).all(|slot| self.element.fits(slot))
    }

    pub fn decode(&self, code: &[Gene]) -> Result<MappedValue> {
        if code.len() != self.size() {
            return Err(GenespaceError::Shape {
                expected: self.size(),
                actual: code.len(),
            });
        }
        Ok(MappedValue::Matrix(
            code.chunks(self.cols).map(|row| row.to_vec()).collect(),
        ))
    }
}
