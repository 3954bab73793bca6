// Physical pointer input.
use std::time::Duration;

use async_trait::async_trait;
use enigo::{Button, Coordinate, Direction, Enigo, Mouse, Settings};

use crate::errors::{HelperError, HelperResult};
use crate::perception::types::CursorPos;

/// The pointer the dispatcher drives. Only the active cycle may use it.
#[async_trait]
pub trait PointerDevice: Send + Sync {
    async fn position(&self) -> HelperResult<CursorPos>;

    async fn move_to(&self, pos: CursorPos) -> HelperResult<()>;

    async fn left_down(&self) -> HelperResult<()>;

    async fn left_up(&self) -> HelperResult<()>;
}

/// How many times a move is re-issued before giving up on the cursor landing.
pub const MOVE_ATTEMPTS: u32 = 20;

const MOVE_RETRY_DELAY: Duration = Duration::from_millis(10);

/// Desktop pointer backed by `enigo`.
///
/// Every call runs on a blocking thread with its own connection, since enigo
/// handles are not safe to share across the runtime's workers.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnigoPointer;

impl EnigoPointer {
    pub fn new() -> Self {
        Self
    }
}

async fn with_enigo<F, T>(op: F) -> HelperResult<T>
where
    F: FnOnce(&mut Enigo) -> HelperResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut enigo = Enigo::new(&Settings::default())
            .map_err(|e| HelperError::Input(format!("enigo init: {e}")))?;
        op(&mut enigo)
    })
    .await?
}

fn input_err(what: &'static str) -> impl Fn(enigo::InputError) -> HelperError {
    move |e| HelperError::Input(format!("{what}: {e}"))
}

#[async_trait]
impl PointerDevice for EnigoPointer {
    async fn position(&self) -> HelperResult<CursorPos> {
        with_enigo(|enigo| {
            let (x, y) = enigo.location().map_err(input_err("location"))?;
            Ok(CursorPos::new(x, y))
        })
        .await
    }

    /// Re-issues the move until the cursor reports the target position; the
    /// game occasionally swallows the first one while it has focus changes
    /// pending.
    async fn move_to(&self, pos: CursorPos) -> HelperResult<()> {
        with_enigo(move |enigo| {
            for attempt in 1..=MOVE_ATTEMPTS {
                enigo
                    .move_mouse(pos.x, pos.y, Coordinate::Abs)
                    .map_err(input_err("move"))?;
                let (x, y) = enigo.location().map_err(input_err("location"))?;
                if (x, y) == (pos.x, pos.y) {
                    return Ok(());
                }
                tracing::trace!(attempt, x, y, target_x = pos.x, target_y = pos.y, "cursor not there yet");
                std::thread::sleep(MOVE_RETRY_DELAY);
            }
            Err(HelperError::Input(format!(
                "cursor did not reach ({}, {}) after {MOVE_ATTEMPTS} attempts",
                pos.x, pos.y
            )))
        })
        .await
    }

    async fn left_down(&self) -> HelperResult<()> {
        with_enigo(|enigo| {
            enigo
                .button(Button::Left, Direction::Press)
                .map_err(input_err("left down"))
        })
        .await
    }

    async fn left_up(&self) -> HelperResult<()> {
        with_enigo(|enigo| {
            enigo
                .button(Button::Left, Direction::Release)
                .map_err(input_err("left up"))
        })
        .await
    }
}
