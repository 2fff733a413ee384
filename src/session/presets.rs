// Preset questions and sample images
// Author: kelexine (https://github.com/kelexine)

/// A one-click question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetQuestion {
    pub label: &'static str,
    pub text: &'static str,
}

/// A ready-made image URL for quick testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleImage {
    pub label: &'static str,
    pub url: &'static str,
}

pub static PRESET_QUESTIONS: [PresetQuestion; 6] = [
    PresetQuestion {
        label: "🔍 What do you see?",
        text: "What do you see in this image?",
    },
    PresetQuestion {
        label: "🎨 Describe colors",
        text: "Describe the colors and composition of this image",
    },
    PresetQuestion {
        label: "📝 Detailed description",
        text: "Please provide a detailed description of everything you can see in this image",
    },
    PresetQuestion {
        label: "🌟 What stands out?",
        text: "What are the most interesting or notable details in this image?",
    },
    PresetQuestion {
        label: "😊 Mood & atmosphere",
        text: "What's the mood or atmosphere of this image?",
    },
    PresetQuestion {
        label: "🏷️ Identify objects",
        text: "Can you identify and list all the objects or subjects in this image?",
    },
];

pub static SAMPLE_IMAGES: [SampleImage; 3] = [
    SampleImage {
        label: "🍊 Orange",
        url: DEFAULT_IMAGE_URL,
    },
    SampleImage {
        label: "🏞️ Landscape",
        url: "https://images.unsplash.com/photo-1506905925346-21bda4d32df4?w=400",
    },
    SampleImage {
        label: "🐱 Cat",
        url: "https://images.unsplash.com/photo-1574158622682-e40e69881006?w=400",
    },
];

/// The image shown when a session starts.
pub const DEFAULT_IMAGE_URL: &str =
    "https://github.com/MicrosoftLearning/mslearn-ai-vision/raw/refs/heads/main/Labfiles/gen-ai-vision/orange.jpeg";

/// Look up a preset by its 1-based number as shown to the user.
pub fn preset(number: usize) -> Option<&'static PresetQuestion> {
    number.checked_sub(1).and_then(|i| PRESET_QUESTIONS.get(i))
}

/// Look up a sample by its 1-based number as shown to the user.
pub fn sample(number: usize) -> Option<&'static SampleImage> {
    number.checked_sub(1).and_then(|i| SAMPLE_IMAGES.get(i))
}
