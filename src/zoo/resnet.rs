//! ResNet-18 and a plain multi-layer perceptron.

use crate::domain::{IntrospectionError, Member, ModuleLike, NamedChild};
use crate::zoo::layers::{AdaptiveAvgPool2d, BatchNorm2d, Conv2d, Linear, MaxPool2d, ReLU, Sequential};

/// Residual block of two 3x3 convolutions with an optional projection shortcut.
pub struct BasicBlock {
    pub conv1: Conv2d,
    pub bn1: BatchNorm2d,
    pub relu: ReLU,
    pub conv2: Conv2d,
    pub bn2: BatchNorm2d,
    pub downsample: Option<Sequential>,
    pub stride: usize,
}

impl BasicBlock {
    pub const EXPANSION: usize = 1;

    pub fn new(in_planes: usize, planes: usize, stride: usize) -> Self {
        let downsample = (stride != 1 || in_planes != planes * Self::EXPANSION).then(|| {
            let mut shortcut = Sequential::default();
            shortcut.push(Conv2d::new(in_planes, planes * Self::EXPANSION, 1, stride, 0, false));
            shortcut.push(BatchNorm2d::new(planes * Self::EXPANSION));
            shortcut
        });

        Self {
            conv1: Conv2d::new(in_planes, planes, 3, stride, 1, false),
            bn1: BatchNorm2d::new(planes),
            relu: ReLU::new(true),
            conv2: Conv2d::new(planes, planes, 3, 1, 1, false),
            bn2: BatchNorm2d::new(planes),
            downsample,
            stride,
        }
    }
}

impl ModuleLike for BasicBlock {
    fn type_name(&self) -> &str {
        "BasicBlock"
    }

    fn named_children(&self) -> Result<Vec<NamedChild<'_>>, IntrospectionError> {
        let mut children: Vec<NamedChild<'_>> = vec![
            ("conv1".to_string(), &self.conv1 as &dyn ModuleLike),
            ("bn1".to_string(), &self.bn1 as &dyn ModuleLike),
            ("relu".to_string(), &self.relu as &dyn ModuleLike),
            ("conv2".to_string(), &self.conv2 as &dyn ModuleLike),
            ("bn2".to_string(), &self.bn2 as &dyn ModuleLike),
        ];
        if let Some(downsample) = &self.downsample {
            children.push(("downsample".to_string(), downsample as &dyn ModuleLike));
        }
        Ok(children)
    }

    fn members(&self) -> Vec<(String, Member)> {
        vec![
            ("expansion".into(), Member::value(Self::EXPANSION)),
            ("forward".into(), Member::Callable),
            ("stride".into(), Member::value(self.stride)),
            ("training".into(), Member::value(true)),
        ]
    }
}

/// Residual network built from [`BasicBlock`] stages.
pub struct ResNet {
    pub conv1: Conv2d,
    pub bn1: BatchNorm2d,
    pub relu: ReLU,
    pub maxpool: MaxPool2d,
    pub layers: [Sequential; 4],
    pub avgpool: AdaptiveAvgPool2d,
    pub fc: Linear,
}

impl ResNet {
    /// `blocks` gives the number of residual blocks of each of the four stages.
    pub fn new(blocks: [usize; 4], num_classes: usize) -> Self {
        let mut in_planes = 64;
        let mut stage = |planes: usize, count: usize, stride: usize| {
            let mut seq = Sequential::default();
            seq.push(BasicBlock::new(in_planes, planes, stride));
            in_planes = planes * BasicBlock::EXPANSION;
            for _ in 1..count {
                seq.push(BasicBlock::new(in_planes, planes, 1));
            }
            seq
        };
        let layers = [
            stage(64, blocks[0], 1),
            stage(128, blocks[1], 2),
            stage(256, blocks[2], 2),
            stage(512, blocks[3], 2),
        ];

        Self {
            conv1: Conv2d::new(3, 64, 7, 2, 3, false),
            bn1: BatchNorm2d::new(64),
            relu: ReLU::new(true),
            maxpool: MaxPool2d::new(3, 2, 1),
            layers,
            avgpool: AdaptiveAvgPool2d::new((1, 1)),
            fc: Linear::new(512 * BasicBlock::EXPANSION, num_classes, true),
        }
    }
}

impl ModuleLike for ResNet {
    fn type_name(&self) -> &str {
        "ResNet"
    }

    fn named_children(&self) -> Result<Vec<NamedChild<'_>>, IntrospectionError> {
        let mut children: Vec<NamedChild<'_>> = vec![
            ("conv1".to_string(), &self.conv1 as &dyn ModuleLike),
            ("bn1".to_string(), &self.bn1 as &dyn ModuleLike),
            ("relu".to_string(), &self.relu as &dyn ModuleLike),
            ("maxpool".to_string(), &self.maxpool as &dyn ModuleLike),
        ];
        for (i, layer) in self.layers.iter().enumerate() {
            children.push((format!("layer{}", i + 1), layer as &dyn ModuleLike));
        }
        children.push(("avgpool".to_string(), &self.avgpool as &dyn ModuleLike));
        children.push(("fc".to_string(), &self.fc as &dyn ModuleLike));
        Ok(children)
    }

    fn members(&self) -> Vec<(String, Member)> {
        vec![
            ("forward".into(), Member::Callable),
            ("training".into(), Member::value(true)),
        ]
    }
}

/// ResNet-18 with 1000 output classes and zero-initialized weights.
pub fn resnet18() -> ResNet {
    ResNet::new([2, 2, 2, 2], 1000)
}

/// Linear layers of the given widths with a ReLU between consecutive layers.
pub fn mlp(widths: &[usize]) -> Sequential {
    let mut seq = Sequential::default();
    for (i, pair) in widths.windows(2).enumerate() {
        if i > 0 {
            seq.push(ReLU::new(false));
        }
        seq.push(Linear::new(pair[0], pair[1], true));
    }
    seq
}
