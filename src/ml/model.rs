use burn::{
    nn::{
        conv::{Conv2d, Conv2dConfig},
        loss::CrossEntropyLossConfig,
        pool::{MaxPool2d, MaxPool2dConfig},
        Linear, LinearConfig,
    },
    prelude::*,
    tensor::activation::{relu, softmax},
};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct PestCnnConfig {
    pub num_classes: usize,
    #[config(default = 224)]
    pub image_size:  usize,
    #[config(default = 16)]
    pub filters:     usize,
    #[config(default = 3)]
    pub kernel_size: usize,
    #[config(default = 2)]
    pub pool_size:   usize,
    #[config(default = 128)]
    pub hidden:      usize,
}

impl PestCnnConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> PestCnn<B> {
        let conv = Conv2dConfig::new([3, self.filters], [self.kernel_size, self.kernel_size])
            .init(device);
        let pool = MaxPool2dConfig::new([self.pool_size, self.pool_size])
            .with_strides([self.pool_size, self.pool_size])
            .init();
        let hidden = LinearConfig::new(self.flattened_features(), self.hidden).init(device);
        let output = LinearConfig::new(self.hidden, self.num_classes).init(device);
        PestCnn { conv, pool, hidden, output }
    }

    /// Side length after the valid convolution and the pooling
    pub fn pooled_size(&self) -> usize {
        let conv_out = self.image_size - self.kernel_size + 1;
        conv_out / self.pool_size
    }

    /// Width of the flattened feature vector entering the dense layer
    pub fn flattened_features(&self) -> usize {
        let side = self.pooled_size();
        self.filters * side * side
    }
}

/// conv(3→16, 3×3) → ReLU → max-pool(2×2) → flatten → dense(128) → ReLU → dense(classes)
#[derive(Module, Debug)]
pub struct PestCnn<B: Backend> {
    pub conv:   Conv2d<B>,
    pub pool:   MaxPool2d,
    pub hidden: Linear<B>,
    pub output: Linear<B>,
}

impl<B: Backend> PestCnn<B> {
    /// images: [batch, height, width, 3] in [0, 1] → logits: [batch, num_classes]
    pub fn forward(&self, images: Tensor<B, 4>) -> Tensor<B, 2> {
        // Burn convolutions are channel-first
        let x = images.permute([0, 3, 1, 2]);

        let x = relu(self.conv.forward(x));
        let x = self.pool.forward(x);
        let x: Tensor<B, 2> = x.flatten(1, 3);
        let x = relu(self.hidden.forward(x));
        self.output.forward(x)
    }

    /// Class probabilities: softmax over the output layer
    pub fn forward_probs(&self, images: Tensor<B, 4>) -> Tensor<B, 2> {
        softmax(self.forward(images), 1)
    }

    /// Sparse categorical cross-entropy against integer labels
    pub fn forward_loss(
        &self,
        images:  Tensor<B, 4>,
        targets: Tensor<B, 1, Int>,
    ) -> (Tensor<B, 1>, Tensor<B, 2>) {
        let logits = self.forward(images);
        let loss = CrossEntropyLossConfig::new()
            .init(&logits.device())
            .forward(logits.clone(), targets);
        (loss, logits)
    }

    pub fn num_classes(&self) -> usize {
        self.output.weight.val().dims()[1]
    }
}
