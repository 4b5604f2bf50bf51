//! Minimal dense tensor used as a raw attribute value.

/// Dense row-major `f32` tensor.
///
/// Only the data needed for a structural snapshot is kept: the shape and the
/// flat element buffer. `requires_grad` mirrors the tracking flag of learned
/// parameters and is never serialized.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    data: Vec<f32>,
    shape: Vec<usize>,
    requires_grad: bool,
}

impl Tensor {
    /// Create a tensor, returning `None` when `data.len()` does not match the shape.
    pub fn new(data: Vec<f32>, shape: &[usize], requires_grad: bool) -> Option<Self> {
        if data.len() != shape.iter().product::<usize>() {
            return None;
        }
        Some(Self {
            data,
            shape: shape.to_vec(),
            requires_grad,
        })
    }

    pub fn zeros(shape: &[usize]) -> Self {
        Self {
            data: vec![0.0; shape.iter().product()],
            shape: shape.to_vec(),
            requires_grad: false,
        }
    }

    pub fn ones(shape: &[usize]) -> Self {
        Self {
            data: vec![1.0; shape.iter().product()],
            shape: shape.to_vec(),
            requires_grad: false,
        }
    }

    /// Mark as a learnable parameter.
    pub fn parameter(mut self) -> Self {
        self.requires_grad = true;
        self
    }

    /// Flat row-major elements.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn requires_grad(&self) -> bool {
        self.requires_grad
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn numel(&self) -> usize {
        self.data.len()
    }
}
