use crate::time::SimTime;
use std::{fmt::Display, mem};

///
/// A composed limit that terminates the event execution of a runtime.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunLimit {
    /// An unbounded runtime. A runtime with this limit will only finish
    /// once all events are handled and no new events have been created.
    None,

    /// A bound based on the number of executed events. A runtime with this
    /// limit terminates prematurely after the given bound is exceeded, but
    /// finishes normally if the bound-th event is the last one.
    EventCount(usize),

    /// A bound based on the simulation time. A runtime with this bound
    /// terminates once no events scheduled at or before the given
    /// simulation time are left.
    SimTime(SimTime),

    /// Combines two other bounds with a logical AND: the simulation only
    /// terminates if both limits are fulfilled.
    CombinedAnd(Box<RunLimit>, Box<RunLimit>),

    /// Combines two other bounds with a logical OR: the simulation
    /// terminates if either limit is fulfilled.
    CombinedOr(Box<RunLimit>, Box<RunLimit>),
}

impl RunLimit {
    pub(crate) fn applies(&self, itr_count: usize, time: SimTime) -> bool {
        match self {
            Self::None => false,

            Self::EventCount(e) => itr_count > *e,
            Self::SimTime(t) => time > *t,

            Self::CombinedAnd(lhs, rhs) => {
                lhs.applies(itr_count, time) && rhs.applies(itr_count, time)
            }
            Self::CombinedOr(lhs, rhs) => {
                lhs.applies(itr_count, time) || rhs.applies(itr_count, time)
            }
        }
    }

    pub(crate) fn add(&mut self, limit: RunLimit) {
        if matches!(self, Self::None) {
            *self = limit;
        } else {
            let mut other = Self::None;
            mem::swap(&mut other, self);
            *self = Self::CombinedOr(Box::new(other), Box::new(limit));
        }
    }
}

impl Display for RunLimit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "None"),

            Self::EventCount(e) => write!(f, "MaxEventCount({e})"),
            Self::SimTime(t) => write!(f, "MaxSimTime({t})"),

            Self::CombinedAnd(lhs, rhs) => write!(f, "{lhs} and {rhs}"),
            Self::CombinedOr(lhs, rhs) => write!(f, "{lhs} or {rhs}"),
        }
    }
}
