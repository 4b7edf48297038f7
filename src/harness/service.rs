//! Сервис ALU с протоколом start/done поверх каналов tokio
//!
//! Заявка (`start`) отправляется в очередь, ответ (`done`) приходит через
//! oneshot-канал. Заявки выполняются строго по очереди, выходные регистры
//! сохраняются между заявками.

use crate::alu::{NAlu, Opcode, Operands, Outputs};
use crate::error::{AluError, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};

/// Заявка на выполнение одной операции
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AluRequest<const N: usize> {
    pub opcode: Opcode,
    #[serde(flatten)]
    pub operands: Operands<N>,
}

/// Ответ сервиса: номер такта и состояние выходных регистров
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AluResponse<const N: usize> {
    pub cycle: u64,
    pub outputs: Outputs<N>,
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Глубина очереди заявок
    pub queue_depth: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self { queue_depth: 16 }
    }
}

enum Command<const N: usize> {
    Start(AluRequest<N>),
    Reset,
    Halt,
}

struct Envelope<const N: usize> {
    command: Command<N>,
    done: oneshot::Sender<Result<AluResponse<N>>>,
}

/// Запускает задачу сервиса
pub struct AluService;

impl AluService {
    /// Запускает сервис в текущем рантайме tokio и возвращает дескриптор.
    /// Сервис останавливается, когда закрыты все дескрипторы или вызван `shutdown`.
    pub fn spawn<const N: usize>(config: ServiceConfig) -> AluHandle<N> {
        let (tx, rx) = mpsc::channel(config.queue_depth.max(1));
        tokio::spawn(run(NAlu::<N>::new(), rx));
        tracing::info!(dim = N, queue_depth = config.queue_depth, "сервис ALU запущен");
        AluHandle { tx }
    }
}

async fn run<const N: usize>(alu: NAlu<N>, mut rx: mpsc::Receiver<Envelope<N>>) {
    let mut registers = Outputs::<N>::default();
    let mut cycle = 0u64;

    while let Some(Envelope { command, done }) = rx.recv().await {
        let result = match command {
            Command::Start(request) => {
                alu.execute(request.opcode, &request.operands, &mut registers)
            }
            Command::Reset => {
                registers = Outputs::default();
                Ok(())
            }
            Command::Halt => {
                let _ = done.send(Ok(AluResponse { cycle, outputs: registers }));
                break;
            }
        };
        cycle += 1;
        tracing::debug!(cycle, ok = result.is_ok(), "заявка выполнена");

        // Отправитель мог перестать ждать ответа, это не ошибка сервиса
        let _ = done.send(result.map(|()| AluResponse { cycle, outputs: registers }));
    }

    tracing::info!(cycle, "сервис ALU остановлен");
}

/// Дескриптор для отправки заявок в сервис
#[derive(Debug, Clone)]
pub struct AluHandle<const N: usize> {
    tx: mpsc::Sender<Envelope<N>>,
}

impl<const N: usize> AluHandle<N> {
    async fn send(&self, command: Command<N>) -> Result<AluResponse<N>> {
        let (done, wait) = oneshot::channel();
        self.tx
            .send(Envelope { command, done })
            .await
            .map_err(|_| AluError::ServiceStopped)?;
        wait.await.map_err(|_| AluError::ServiceStopped)?
    }

    /// start: отправляет заявку и ждёт сигнала done
    pub async fn submit(&self, request: AluRequest<N>) -> Result<AluResponse<N>> {
        self.send(Command::Start(request)).await
    }

    pub async fn execute(&self, opcode: Opcode, operands: Operands<N>) -> Result<Outputs<N>> {
        let response = self.submit(AluRequest { opcode, operands }).await?;
        Ok(response.outputs)
    }

    /// reset: обнуляет выходные регистры
    pub async fn reset(&self) -> Result<AluResponse<N>> {
        self.send(Command::Reset).await
    }

    /// Останавливает сервис после уже поставленных в очередь заявок
    pub async fn shutdown(&self) -> Result<()> {
        self.send(Command::Halt).await.map(|_| ())
    }
}
