//! Race events and their classification.
//!
//! An [`Event`] is an immutable fact read from the event log (a primary
//! event) or produced by the competitor state machine (a synthesized event).
//! The only field that changes after creation is the `consumed` flag, which
//! marks an event as already applied so that re-scanning a sequence never
//! double-processes it.

use chrono::NaiveTime;

use crate::ids::CompetitorId;

/// Shot target value that the scoring policy treats as a miss.
pub const MISS_TARGET: u32 = 3;

/// Raw textual form of [`MISS_TARGET`] as it appears in the event log.
///
/// The abandonment gap-fill pass compares parameters against this string
/// while the shot handler compares the parsed integer. Both forms are kept.
pub const MISS_TARGET_TEXT: &str = "3";

/// Abandon comment that marks a competitor who got lost on the course.
pub const LOST_IN_FOREST: &str = "Lost in the forest";

/// Error returned when an event kind code is not part of the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown event kind code: {0}")]
pub struct UnknownEventKind(pub u16);

/// Classification of a race event.
///
/// Codes 1 through 11 arrive from the event log. Codes 32 and 33 are
/// synthesized by the state machine on disqualification and finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventKind {
    /// The competitor registered (code 1).
    Registration,
    /// The start time was set by a draw (code 2).
    SetStartTime,
    /// The competitor is on the start line (code 3).
    OnStartLine,
    /// The competitor has started (code 4).
    Started,
    /// The competitor is on a firing range (code 5).
    OnFiringRange,
    /// A target was shot at (code 6).
    Shot,
    /// The competitor left the firing range (code 7).
    LeftFiringRange,
    /// The competitor entered the penalty loop (code 8).
    EnteredPenalty,
    /// The competitor left the penalty loop (code 9).
    LeftPenalty,
    /// The competitor ended a main lap (code 10).
    LapCompleted,
    /// The competitor cannot continue (code 11).
    Abandoned,
    /// The competitor was disqualified (code 32, synthesized).
    Disqualified,
    /// The competitor finished the race (code 33, synthesized).
    Finished,
}

impl EventKind {
    /// Every kind, in code order.
    pub const ALL: [Self; 13] = [
        Self::Registration,
        Self::SetStartTime,
        Self::OnStartLine,
        Self::Started,
        Self::OnFiringRange,
        Self::Shot,
        Self::LeftFiringRange,
        Self::EnteredPenalty,
        Self::LeftPenalty,
        Self::LapCompleted,
        Self::Abandoned,
        Self::Disqualified,
        Self::Finished,
    ];

    /// Return the numeric code used in the event log.
    pub const fn code(self) -> u16 {
        match self {
            Self::Registration => 1,
            Self::SetStartTime => 2,
            Self::OnStartLine => 3,
            Self::Started => 4,
            Self::OnFiringRange => 5,
            Self::Shot => 6,
            Self::LeftFiringRange => 7,
            Self::EnteredPenalty => 8,
            Self::LeftPenalty => 9,
            Self::LapCompleted => 10,
            Self::Abandoned => 11,
            Self::Disqualified => 32,
            Self::Finished => 33,
        }
    }

    /// Whether this kind is only ever produced by the state machine.
    pub const fn is_synthesized(self) -> bool {
        matches!(self, Self::Disqualified | Self::Finished)
    }
}

impl TryFrom<u16> for EventKind {
    type Error = UnknownEventKind;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::Registration),
            2 => Ok(Self::SetStartTime),
            3 => Ok(Self::OnStartLine),
            4 => Ok(Self::Started),
            5 => Ok(Self::OnFiringRange),
            6 => Ok(Self::Shot),
            7 => Ok(Self::LeftFiringRange),
            8 => Ok(Self::EnteredPenalty),
            9 => Ok(Self::LeftPenalty),
            10 => Ok(Self::LapCompleted),
            11 => Ok(Self::Abandoned),
            32 => Ok(Self::Disqualified),
            33 => Ok(Self::Finished),
            other => Err(UnknownEventKind(other)),
        }
    }
}

impl core::fmt::Display for EventKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A single timestamped race event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Time of day at which the event happened.
    pub time: NaiveTime,
    /// What happened.
    pub kind: EventKind,
    /// The competitor the event refers to.
    pub competitor_id: CompetitorId,
    /// Free-form parameter whose meaning depends on `kind`.
    pub parameter: Option<String>,
    /// Whether the state machine has already applied this event.
    consumed: bool,
}

impl Event {
    /// Create a new, unconsumed event without a parameter.
    pub const fn new(time: NaiveTime, kind: EventKind, competitor_id: CompetitorId) -> Self {
        Self {
            time,
            kind,
            competitor_id,
            parameter: None,
            consumed: false,
        }
    }

    /// Create an event produced by the state machine. It is born consumed.
    pub const fn synthesized(time: NaiveTime, kind: EventKind, competitor_id: CompetitorId) -> Self {
        Self {
            time,
            kind,
            competitor_id,
            parameter: None,
            consumed: true,
        }
    }

    /// Attach a parameter string to the event.
    #[must_use]
    pub fn with_parameter(mut self, parameter: impl Into<String>) -> Self {
        self.parameter = Some(parameter.into());
        self
    }

    /// The parameter as a string slice, empty when absent.
    pub fn parameter_str(&self) -> &str {
        self.parameter.as_deref().unwrap_or("")
    }

    /// Whether the event has already been applied.
    pub const fn is_consumed(&self) -> bool {
        self.consumed
    }

    /// Mark the event as applied.
    pub const fn mark_consumed(&mut self) {
        self.consumed = true;
    }
}
