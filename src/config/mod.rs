// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Server configuration from CLI flags with environment fallbacks

use anyhow::{Context, Result};
use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::vision::{LoaderConfig, VisionModelConfig};

#[derive(Parser, Debug, Clone)]
#[command(name = "captcha-assist-server")]
#[command(version)]
#[command(about = "HTTP service for solving captcha images", long_about = None)]
pub struct ServerConfig {
    /// Address to listen on (IPv4 or IPv6 literal)
    #[arg(long, env = "CAPTCHA_HOST", default_value = "::")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "CAPTCHA_PORT", default_value_t = 7777)]
    pub port: u16,

    /// OCR classification model (ONNX)
    #[arg(long, env = "OCR_MODEL_PATH", default_value = "./models/common.onnx")]
    pub ocr_model: PathBuf,

    /// Charset for the OCR model (JSON)
    #[arg(long, env = "OCR_CHARSET_PATH", default_value = "./models/charsets.json")]
    pub ocr_charset: PathBuf,

    /// Detection model (ONNX)
    #[arg(long, env = "DET_MODEL_PATH", default_value = "./models/common_det.onnx")]
    pub det_model: PathBuf,

    /// Append-only log file; empty disables file logging
    #[arg(long, env = "CAPTCHA_LOG_FILE", default_value = "app.log")]
    pub log_file: String,

    /// Skip TLS certificate validation when fetching image URLs
    #[arg(long, env = "CAPTCHA_INSECURE_FETCH", default_value_t = false)]
    pub insecure_fetch: bool,

    /// Timeout for fetching image URLs
    #[arg(long, env = "CAPTCHA_FETCH_TIMEOUT_SECS", default_value_t = 30)]
    pub fetch_timeout_secs: u64,

    /// Largest accepted request body
    #[arg(long, env = "CAPTCHA_MAX_BODY_BYTES", default_value_t = 10 * 1024 * 1024)]
    pub max_body_bytes: usize,

    /// ONNX Runtime intra-op threads per model
    #[arg(long, env = "ORT_INTRA_THREADS", default_value_t = 4)]
    pub intra_threads: usize,
}

impl ServerConfig {
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        let host = self.host.trim_start_matches('[').trim_end_matches(']');
        let ip: IpAddr = host
            .parse()
            .with_context(|| format!("invalid listen host '{}'", self.host))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn log_file(&self) -> Option<PathBuf> {
        let trimmed = self.log_file.trim();
        (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
    }

    pub fn vision_config(&self) -> VisionModelConfig {
        VisionModelConfig {
            ocr_model_path: Some(self.ocr_model.clone()),
            ocr_charset_path: Some(self.ocr_charset.clone()),
            det_model_path: Some(self.det_model.clone()),
            intra_threads: self.intra_threads,
        }
    }

    pub fn loader_config(&self) -> LoaderConfig {
        LoaderConfig {
            accept_invalid_certs: self.insecure_fetch,
            fetch_timeout: Duration::from_secs(self.fetch_timeout_secs),
        }
    }
}
