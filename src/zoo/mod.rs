//! Reference model hierarchies implementing [`ModuleLike`](crate::domain::ModuleLike).
//!
//! Used by the CLI and by tests; parameters are zero-initialized.

pub mod layers;
pub mod resnet;

pub use layers::{AdaptiveAvgPool2d, BatchNorm2d, Conv2d, Linear, MaxPool2d, ReLU, Sequential};
pub use resnet::{mlp, resnet18, BasicBlock, ResNet};
