//! 序列化相关错误类型
//!
//! 定义所有与数据序列化、反序列化相关的错误

use thiserror::Error;

/// 序列化相关错误
#[derive(Error, Debug)]
pub enum SerializationError {
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}
