//! Framework-style layers exposing the module-like capability.
//!
//! Members mirror what reflective introspection of a typical deep-learning
//! layer yields: hyperparameters, learned tensors, the `T_destination`
//! type-variable marker, private bookkeeping and bound methods.

use crate::domain::{AttrValue, IntrospectionError, Member, ModuleLike, NamedChild, Tensor};

/// Members every module carries, whatever its kind.
fn module_members(training: bool) -> Vec<(String, Member)> {
    vec![
        (
            "T_destination".into(),
            Member::value(AttrValue::Placeholder("T_destination".into())),
        ),
        ("_buffers".into(), Member::value(AttrValue::opaque("OrderedDict"))),
        ("_modules".into(), Member::value(AttrValue::opaque("OrderedDict"))),
        ("_parameters".into(), Member::value(AttrValue::opaque("OrderedDict"))),
        ("call_super_init".into(), Member::value(false)),
        ("dump_patches".into(), Member::value(false)),
        ("eval".into(), Member::Callable),
        ("forward".into(), Member::Callable),
        ("parameters".into(), Member::Callable),
        ("state_dict".into(), Member::Callable),
        ("train".into(), Member::Callable),
        ("training".into(), Member::value(training)),
    ]
}

fn with_module_members(training: bool, own: Vec<(&str, Member)>) -> Vec<(String, Member)> {
    let mut members = module_members(training);
    members.extend(own.into_iter().map(|(k, v)| (k.to_string(), v)));
    members
}

/// 2-D convolution.
#[derive(Debug, Clone)]
pub struct Conv2d {
    pub in_channels: usize,
    pub out_channels: usize,
    pub kernel_size: (usize, usize),
    pub stride: (usize, usize),
    pub padding: (usize, usize),
    pub dilation: (usize, usize),
    pub groups: usize,
    pub weight: Tensor,
    pub bias: Option<Tensor>,
    pub training: bool,
}

impl Conv2d {
    pub fn new(
        in_channels: usize,
        out_channels: usize,
        kernel_size: usize,
        stride: usize,
        padding: usize,
        bias: bool,
    ) -> Self {
        Self {
            in_channels,
            out_channels,
            kernel_size: (kernel_size, kernel_size),
            stride: (stride, stride),
            padding: (padding, padding),
            dilation: (1, 1),
            groups: 1,
            weight: Tensor::zeros(&[out_channels, in_channels, kernel_size, kernel_size])
                .parameter(),
            bias: bias.then(|| Tensor::zeros(&[out_channels]).parameter()),
            training: true,
        }
    }
}

impl ModuleLike for Conv2d {
    fn type_name(&self) -> &str {
        "Conv2d"
    }

    fn named_children(&self) -> Result<Vec<NamedChild<'_>>, IntrospectionError> {
        Ok(Vec::new())
    }

    fn members(&self) -> Vec<(String, Member)> {
        with_module_members(
            self.training,
            vec![
                ("_conv_forward", Member::Callable),
                ("bias", Member::value(self.bias.clone())),
                ("dilation", Member::value(self.dilation)),
                ("groups", Member::value(self.groups)),
                ("in_channels", Member::value(self.in_channels)),
                ("kernel_size", Member::value(self.kernel_size)),
                ("out_channels", Member::value(self.out_channels)),
                ("output_padding", Member::value((0usize, 0usize))),
                ("padding", Member::value(self.padding)),
                ("padding_mode", Member::value("zeros")),
                ("stride", Member::value(self.stride)),
                ("transposed", Member::value(false)),
                ("weight", Member::value(self.weight.clone())),
            ],
        )
    }
}

/// Batch normalization over 4-D input.
#[derive(Debug, Clone)]
pub struct BatchNorm2d {
    pub num_features: usize,
    pub eps: f64,
    pub momentum: f64,
    pub weight: Tensor,
    pub bias: Tensor,
    pub running_mean: Tensor,
    pub running_var: Tensor,
    pub num_batches_tracked: Tensor,
    pub training: bool,
}

impl BatchNorm2d {
    pub fn new(num_features: usize) -> Self {
        Self {
            num_features,
            eps: 1e-5,
            momentum: 0.1,
            weight: Tensor::ones(&[num_features]).parameter(),
            bias: Tensor::zeros(&[num_features]).parameter(),
            running_mean: Tensor::zeros(&[num_features]),
            running_var: Tensor::ones(&[num_features]),
            num_batches_tracked: Tensor::zeros(&[]),
            training: true,
        }
    }
}

impl ModuleLike for BatchNorm2d {
    fn type_name(&self) -> &str {
        "BatchNorm2d"
    }

    fn named_children(&self) -> Result<Vec<NamedChild<'_>>, IntrospectionError> {
        Ok(Vec::new())
    }

    fn members(&self) -> Vec<(String, Member)> {
        with_module_members(
            self.training,
            vec![
                ("_check_input_dim", Member::Callable),
                ("affine", Member::value(true)),
                ("bias", Member::value(self.bias.clone())),
                ("eps", Member::value(self.eps)),
                ("momentum", Member::value(self.momentum)),
                ("num_batches_tracked", Member::value(self.num_batches_tracked.clone())),
                ("num_features", Member::value(self.num_features)),
                ("reset_parameters", Member::Callable),
                ("running_mean", Member::value(self.running_mean.clone())),
                ("running_var", Member::value(self.running_var.clone())),
                ("track_running_stats", Member::value(true)),
                ("weight", Member::value(self.weight.clone())),
            ],
        )
    }
}

#[derive(Debug, Clone)]
pub struct ReLU {
    pub inplace: bool,
    pub training: bool,
}

impl ReLU {
    pub fn new(inplace: bool) -> Self {
        Self {
            inplace,
            training: true,
        }
    }
}

impl ModuleLike for ReLU {
    fn type_name(&self) -> &str {
        "ReLU"
    }

    fn named_children(&self) -> Result<Vec<NamedChild<'_>>, IntrospectionError> {
        Ok(Vec::new())
    }

    fn members(&self) -> Vec<(String, Member)> {
        with_module_members(self.training, vec![("inplace", Member::value(self.inplace))])
    }
}

#[derive(Debug, Clone)]
pub struct MaxPool2d {
    pub kernel_size: usize,
    pub stride: usize,
    pub padding: usize,
    pub training: bool,
}

impl MaxPool2d {
    pub fn new(kernel_size: usize, stride: usize, padding: usize) -> Self {
        Self {
            kernel_size,
            stride,
            padding,
            training: true,
        }
    }
}

impl ModuleLike for MaxPool2d {
    fn type_name(&self) -> &str {
        "MaxPool2d"
    }

    fn named_children(&self) -> Result<Vec<NamedChild<'_>>, IntrospectionError> {
        Ok(Vec::new())
    }

    fn members(&self) -> Vec<(String, Member)> {
        with_module_members(
            self.training,
            vec![
                ("ceil_mode", Member::value(false)),
                ("dilation", Member::value(1usize)),
                ("kernel_size", Member::value(self.kernel_size)),
                ("padding", Member::value(self.padding)),
                ("return_indices", Member::value(false)),
                ("stride", Member::value(self.stride)),
            ],
        )
    }
}

#[derive(Debug, Clone)]
pub struct AdaptiveAvgPool2d {
    pub output_size: (usize, usize),
    pub training: bool,
}

impl AdaptiveAvgPool2d {
    pub fn new(output_size: (usize, usize)) -> Self {
        Self {
            output_size,
            training: true,
        }
    }
}

impl ModuleLike for AdaptiveAvgPool2d {
    fn type_name(&self) -> &str {
        "AdaptiveAvgPool2d"
    }

    fn named_children(&self) -> Result<Vec<NamedChild<'_>>, IntrospectionError> {
        Ok(Vec::new())
    }

    fn members(&self) -> Vec<(String, Member)> {
        with_module_members(
            self.training,
            vec![("output_size", Member::value(self.output_size))],
        )
    }
}

/// Fully-connected layer: y = xWᵀ + b
#[derive(Debug, Clone)]
pub struct Linear {
    pub in_features: usize,
    pub out_features: usize,
    pub weight: Tensor,
    pub bias: Option<Tensor>,
    pub training: bool,
}

impl Linear {
    pub fn new(in_features: usize, out_features: usize, bias: bool) -> Self {
        Self {
            in_features,
            out_features,
            weight: Tensor::zeros(&[out_features, in_features]).parameter(),
            bias: bias.then(|| Tensor::zeros(&[out_features]).parameter()),
            training: true,
        }
    }
}

impl ModuleLike for Linear {
    fn type_name(&self) -> &str {
        "Linear"
    }

    fn named_children(&self) -> Result<Vec<NamedChild<'_>>, IntrospectionError> {
        Ok(Vec::new())
    }

    fn members(&self) -> Vec<(String, Member)> {
        with_module_members(
            self.training,
            vec![
                ("bias", Member::value(self.bias.clone())),
                ("in_features", Member::value(self.in_features)),
                ("out_features", Member::value(self.out_features)),
                ("reset_parameters", Member::Callable),
                ("weight", Member::value(self.weight.clone())),
            ],
        )
    }
}

/// Ordered container; children are named by position.
#[derive(Default)]
pub struct Sequential {
    layers: Vec<Box<dyn ModuleLike>>,
}

impl Sequential {
    pub fn new(layers: Vec<Box<dyn ModuleLike>>) -> Self {
        Self { layers }
    }

    pub fn push(&mut self, layer: impl ModuleLike + 'static) {
        self.layers.push(Box::new(layer));
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl ModuleLike for Sequential {
    fn type_name(&self) -> &str {
        "Sequential"
    }

    fn named_children(&self) -> Result<Vec<NamedChild<'_>>, IntrospectionError> {
        Ok(self
            .layers
            .iter()
            .enumerate()
            .map(|(i, layer)| (i.to_string(), &**layer as &dyn ModuleLike))
            .collect())
    }

    fn members(&self) -> Vec<(String, Member)> {
        with_module_members(true, vec![("append", Member::Callable)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_linear_without_bias_when_listing_members_then_bias_is_none() {
        let linear = Linear::new(4, 2, false);
        let bias = linear
            .members()
            .into_iter()
            .find(|(k, _)| k == "bias")
            .map(|(_, v)| v);
        assert_eq!(bias, Some(Member::Value(AttrValue::None)));
    }

    #[test]
    fn given_sequential_when_listing_children_then_named_by_position() {
        let mut seq = Sequential::default();
        seq.push(Linear::new(2, 2, true));
        seq.push(ReLU::new(false));

        let names: Vec<String> = seq
            .named_children()
            .unwrap()
            .into_iter()
            .map(|(name, child)| format!("{}:{}", name, child.type_name()))
            .collect();

        assert_eq!(names, vec!["0:Linear", "1:ReLU"]);
    }
}
