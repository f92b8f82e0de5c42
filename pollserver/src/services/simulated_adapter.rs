//! Software stand-in for the classroom response hardware
//!
//! Keeps the same command contract as a hardware adapter: a class must be
//! started before a question, and notifications go to the single subscribed
//! sender. Every command is recorded so tests can inspect what the session
//! manager asked for. Answers arrive through `deliver` or, when configured,
//! from a background auto-responder while a question is open.

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::core::question::choice_label;
use crate::core::{QuestionSpec, QuestionType, Roster};
use crate::error::AdapterError;
use crate::traits::DeviceAdapter;
use crate::types::{ResponseNotification, ResponseSender};
use shared::{SimulatorConfig, Source, source_debug, source_info, source_warn};

const SHORT_TEXT_ANSWERS: [&str; 6] = ["photosynthesis", "42", "Paris", "mitochondria", "I don't know", "velocity"];

/// Command received by the simulated device, in issue order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceCommand {
    Connect,
    Disconnect,
    StartClass { name: String, student_count: usize },
    StopClass,
    StartQuestion { question_id: Uuid, kind: QuestionType },
    StopQuestion,
    Subscribe,
}

#[derive(Default)]
struct SimulatorState {
    connected: bool,
    class: Option<Roster>,
    question: Option<QuestionSpec>,
    /// Id of the most recently opened question, kept after it closes
    last_question_id: Option<Uuid>,
    subscriber: Option<ResponseSender>,
    commands: Vec<DeviceCommand>,
    responder: Option<JoinHandle<()>>,
}

impl SimulatorState {
    fn require_connected(&self) -> Result<(), AdapterError> {
        if self.connected {
            Ok(())
        } else {
            Err(AdapterError::NotConnected)
        }
    }

    fn stop_responder(&mut self) {
        if let Some(handle) = self.responder.take() {
            handle.abort();
        }
    }
}

pub struct SimulatedDeviceAdapter {
    state: Arc<Mutex<SimulatorState>>,
    config: SimulatorConfig,
}

impl Default for SimulatedDeviceAdapter {
    fn default() -> Self {
        Self::new(SimulatorConfig::default())
    }
}

impl SimulatedDeviceAdapter {
    pub fn new(config: SimulatorConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(SimulatorState::default())),
            config,
        }
    }

    /// Simulate one student answering. Works at any time after a question
    /// has been opened, including after it was closed again.
    pub async fn deliver(&self, student_id: &str, answer: &str) -> Result<(), AdapterError> {
        let (sender, question_id) = {
            let state = self.state.lock().await;
            let sender = state.subscriber.clone().ok_or(AdapterError::SubscriberClosed)?;
            let question_id = state.last_question_id.map(|id| id.to_string()).unwrap_or_default();
            (sender, question_id)
        };

        sender
            .send(ResponseNotification::new(student_id, question_id, answer))
            .await
            .map_err(|_| AdapterError::SubscriberClosed)
    }

    /// Commands received so far
    pub async fn commands(&self) -> Vec<DeviceCommand> {
        self.state.lock().await.commands.clone()
    }

    pub async fn open_question(&self) -> Option<QuestionSpec> {
        self.state.lock().await.question.clone()
    }

    pub async fn active_class(&self) -> Option<String> {
        self.state.lock().await.class.as_ref().map(|r| r.name().to_string())
    }

    fn spawn_responder(&self, interval: Duration) -> JoinHandle<()> {
        let state = self.state.clone();

        tokio::spawn(async move {
            let mut rng = StdRng::from_entropy();
            let mut ticker = tokio::time::interval(interval);
            // First tick completes immediately
            ticker.tick().await;

            loop {
                ticker.tick().await;

                let pending = {
                    let state = state.lock().await;
                    match (&state.class, &state.question, &state.subscriber) {
                        (Some(class), Some(question), Some(sender)) => class
                            .students()
                            .choose(&mut rng)
                            .map(|student| {
                                let answer = simulated_answer(question, &mut rng);
                                (
                                    sender.clone(),
                                    ResponseNotification::new(student.id(), question.id().to_string(), answer),
                                )
                            }),
                        _ => None,
                    }
                };

                let Some((sender, notification)) = pending else {
                    continue;
                };

                match sender.try_send(notification) {
                    Ok(()) => {}
                    Err(TrySendError::Full(dropped)) => {
                        source_warn!(
                            Source::Device,
                            "⚠️ Response queue full, dropping simulated answer from {}",
                            dropped.student_id
                        );
                    }
                    Err(TrySendError::Closed(_)) => {
                        source_debug!(Source::Device, "Response subscriber gone, auto-responder exiting");
                        break;
                    }
                }
            }
        })
    }
}

/// Plausible answer for the question's type
pub fn simulated_answer<R: Rng>(question: &QuestionSpec, rng: &mut R) -> String {
    let labels: Vec<char> = (0..question.choices().len()).filter_map(choice_label).collect();

    match question.kind() {
        QuestionType::MultipleChoice => labels.choose(rng).map(|c| c.to_string()).unwrap_or_default(),
        QuestionType::MultipleAnswer => {
            let count = rng.gen_range(1..=labels.len().max(1));
            let mut picked: Vec<char> = labels.choose_multiple(rng, count).copied().collect();
            picked.sort_unstable();
            picked.into_iter().collect()
        }
        QuestionType::YesNo | QuestionType::TrueFalse => question.choices().choose(rng).cloned().unwrap_or_default(),
        QuestionType::Decimal => format!("{:.1}", rng.gen_range(0.0..100.0)),
        QuestionType::Fractional => {
            let denominator = rng.gen_range(2..=12);
            format!("{}/{}", rng.gen_range(1..denominator), denominator)
        }
        QuestionType::ShortText => SHORT_TEXT_ANSWERS.choose(rng).map(|s| s.to_string()).unwrap_or_default(),
    }
}

#[async_trait]
impl DeviceAdapter for SimulatedDeviceAdapter {
    async fn connect(&self) -> Result<(), AdapterError> {
        if self.config.fail_connect {
            return Err(AdapterError::ConnectionFailed("simulated device refused connection".to_string()));
        }

        let mut state = self.state.lock().await;
        state.commands.push(DeviceCommand::Connect);
        state.connected = true;
        source_info!(Source::Device, "🔌 Simulated response devices connected");
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), AdapterError> {
        let mut state = self.state.lock().await;
        state.commands.push(DeviceCommand::Disconnect);
        state.stop_responder();
        state.question = None;
        state.class = None;
        state.subscriber = None;
        state.connected = false;
        source_info!(Source::Device, "🔌 Simulated response devices disconnected");
        Ok(())
    }

    async fn is_connected(&self) -> bool {
        self.state.lock().await.connected
    }

    async fn start_class(&self, roster: &Roster) -> Result<(), AdapterError> {
        let mut state = self.state.lock().await;
        state.require_connected()?;
        state.commands.push(DeviceCommand::StartClass {
            name: roster.name().to_string(),
            student_count: roster.len(),
        });
        state.class = Some(roster.clone());
        Ok(())
    }

    async fn stop_class(&self) -> Result<(), AdapterError> {
        let mut state = self.state.lock().await;
        state.require_connected()?;
        state.commands.push(DeviceCommand::StopClass);
        state.stop_responder();
        state.question = None;
        state.class = None;
        Ok(())
    }

    async fn start_question(&self, question: &QuestionSpec) -> Result<(), AdapterError> {
        let mut state = self.state.lock().await;
        state.require_connected()?;
        if state.class.is_none() {
            return Err(AdapterError::command("startQuestion", "no class started"));
        }

        state.commands.push(DeviceCommand::StartQuestion {
            question_id: question.id(),
            kind: question.kind(),
        });
        state.stop_responder();
        state.question = Some(question.clone());
        state.last_question_id = Some(question.id());

        if let Some(interval) = self.config.auto_respond_interval() {
            state.responder = Some(self.spawn_responder(interval));
        }
        Ok(())
    }

    async fn stop_question(&self) -> Result<(), AdapterError> {
        let mut state = self.state.lock().await;
        state.require_connected()?;
        state.commands.push(DeviceCommand::StopQuestion);
        state.stop_responder();
        state.question = None;
        Ok(())
    }

    async fn subscribe_responses(&self, sender: ResponseSender) -> Result<(), AdapterError> {
        let mut state = self.state.lock().await;
        state.require_connected()?;
        state.commands.push(DeviceCommand::Subscribe);
        state.subscriber = Some(sender);
        Ok(())
    }
}
