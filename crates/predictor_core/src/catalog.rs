//! Static catalog of the models the prediction service understands.

/// One selectable model option. Carries metadata only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelDescriptor {
    /// Identifier sent as `model_name` with every prediction request.
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Accent colour as `[r, g, b]`.
    pub accent: [u8; 3],
}

pub const DEFAULT_MODEL_ID: &str = "resnet";

pub static MODELS: [ModelDescriptor; 4] = [
    ModelDescriptor {
        id: "resnet",
        name: "ResNet-50",
        description: "Deep residual network for general image classification",
        accent: [0x3b, 0x82, 0xf6],
    },
    ModelDescriptor {
        id: "unet",
        name: "U-Net",
        description: "Lightweight model optimized for mobile devices",
        accent: [0x10, 0xb9, 0x81],
    },
    ModelDescriptor {
        id: "efficientnet",
        name: "EfficientNet",
        description: "Balanced accuracy and efficiency",
        accent: [0x8b, 0x5c, 0xf6],
    },
    ModelDescriptor {
        id: "model4",
        name: "Unknown",
        description: "Under Progress",
        accent: [0xf5, 0x9e, 0x0b],
    },
];

/// Look up a catalog entry by id.
pub fn find_model(id: &str) -> Option<&'static ModelDescriptor> {
    MODELS.iter().find(|m| m.id == id)
}

/// The entry selected when nothing else has been chosen.
pub fn default_model() -> &'static ModelDescriptor {
    &MODELS[0]
}

/// Resolve a configured id, falling back to the default entry.
pub fn model_or_default(id: &str) -> &'static ModelDescriptor {
    match find_model(id) {
        Some(model) => model,
        None => {
            tracing::warn!("Unknown model id {id:?}, using {DEFAULT_MODEL_ID}");
            default_model()
        }
    }
}
