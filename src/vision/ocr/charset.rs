// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Character set files for the classification model
//!
//! Two layouts are accepted:
//! - a bare JSON array of strings (index 0 is the CTC blank, usually `""`)
//! - an object `{"charset": [...], "image": [w, h], "channel": n}` where a
//!   width of `-1` means "keep the aspect ratio"

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use super::preprocessing::ClassifierInput;

const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CharsetFile {
    Plain(Vec<String>),
    Described {
        charset: Vec<String>,
        #[serde(default)]
        image: Option<[i64; 2]>,
        #[serde(default = "default_channel")]
        channel: usize,
    },
}

fn default_channel() -> usize {
    1
}

/// Decoding table plus the input layout it was trained with
#[derive(Debug, Clone)]
pub struct Charset {
    pub symbols: Vec<String>,
    pub input: ClassifierInput,
}

impl Charset {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read charset: {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("Invalid charset file: {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let charset = match serde_json::from_str::<CharsetFile>(raw)? {
            CharsetFile::Plain(symbols) => Self {
                symbols,
                input: ClassifierInput::default(),
            },
            CharsetFile::Described {
                charset,
                image,
                channel,
            } => {
                if channel != 1 && channel != 3 {
                    anyhow::bail!("channel must be 1 or 3, got {}", channel);
                }
                let [width, height] = image.unwrap_or([-1, 64]);
                if height <= 0 {
                    anyhow::bail!("image height must be positive, got {}", height);
                }
                let (mean, std) = if channel == 1 {
                    ([IMAGENET_MEAN[1]; 3], [IMAGENET_STD[1]; 3])
                } else {
                    (IMAGENET_MEAN, IMAGENET_STD)
                };
                Self {
                    symbols: charset,
                    input: ClassifierInput {
                        width: (width > 0).then_some(width as u32),
                        height: height as u32,
                        channels: channel,
                        mean,
                        std,
                    },
                }
            }
        };

        if charset.symbols.is_empty() {
            anyhow::bail!("charset is empty");
        }
        Ok(charset)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Greedy CTC decoding: collapse repeats, then drop the blank (index 0)
    pub fn decode(&self, indices: &[usize]) -> String {
        let mut text = String::new();
        let mut last = 0usize;
        for &index in indices {
            if index == last {
                continue;
            }
            last = index;
            if index != 0 {
                if let Some(symbol) = self.symbols.get(index) {
                    text.push_str(symbol);
                }
            }
        }
        text
    }
}
