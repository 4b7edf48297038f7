//! Обвязка вокруг N-ALU: протокол start/done и транспортное кодирование
//!
//! Тактовая модель не воспроизводится: заявка и ответ передаются через
//! асинхронные каналы, а упаковка f32 в 32-битные слова вынесена в `codec`.

pub mod codec;
mod service;

pub use service::{AluHandle, AluRequest, AluResponse, AluService, ServiceConfig};
