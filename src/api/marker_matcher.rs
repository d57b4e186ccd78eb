use indexmap::IndexSet;
use ordered_float::OrderedFloat;
use tracing::debug;

use crate::core::Slice;
use crate::error::{TimelineError, TimelineResult};

use super::TimelineModel;

/// Ordered marker names requested from [`TimelineModel::find_timeline_markers`].
///
/// Absent (`None`) names are dropped on conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkerNames<'a>(Vec<&'a str>);

impl<'a> MarkerNames<'a> {
    #[must_use]
    pub fn as_slice(&self) -> &[&'a str] {
        &self.0
    }
}

impl<'a> From<&'a str> for MarkerNames<'a> {
    fn from(name: &'a str) -> Self {
        Self(vec![name])
    }
}

impl<'a> From<Vec<&'a str>> for MarkerNames<'a> {
    fn from(names: Vec<&'a str>) -> Self {
        Self(names)
    }
}

impl<'a> From<&[&'a str]> for MarkerNames<'a> {
    fn from(names: &[&'a str]) -> Self {
        Self(names.to_vec())
    }
}

impl<'a, const N: usize> From<[&'a str; N]> for MarkerNames<'a> {
    fn from(names: [&'a str; N]) -> Self {
        Self(names.to_vec())
    }
}

impl<'a> From<Vec<Option<&'a str>>> for MarkerNames<'a> {
    fn from(names: Vec<Option<&'a str>>) -> Self {
        Self(names.into_iter().flatten().collect())
    }
}

impl<'a> From<&[Option<&'a str>]> for MarkerNames<'a> {
    fn from(names: &[Option<&'a str>]) -> Self {
        Self(names.iter().copied().flatten().collect())
    }
}

impl TimelineModel {
    /// Finds the root events marking benchmark phases, one per requested name.
    ///
    /// Matching events are ordered by start time (ties keep traversal order).
    /// Their names must equal `names` position by position, and no marker may
    /// start before the previous ones end.
    pub fn find_timeline_markers<'n>(
        &self,
        names: impl Into<MarkerNames<'n>>,
    ) -> TimelineResult<Vec<&Slice>> {
        let names = names.into();
        let names = names.as_slice();

        let distinct: IndexSet<&str> = names.iter().copied().collect();
        let mut events: Vec<&Slice> = distinct
            .iter()
            .flat_map(|name| self.events_of_name(name, true))
            .collect();
        events.sort_by_key(|event| OrderedFloat(event.start));

        let names_match = events.len() == names.len()
            && events
                .iter()
                .zip(names)
                .all(|(event, name)| event.name == *name);
        if !names_match {
            debug!(
                requested = names.len(),
                found = events.len(),
                "timeline markers do not match requested names"
            );
            return Err(TimelineError::MarkerMismatch);
        }

        for (i, earlier) in events.iter().enumerate() {
            for later in &events[i + 1..] {
                if later.start < earlier.start + earlier.duration {
                    return Err(TimelineError::MarkerOverlap);
                }
            }
        }

        Ok(events)
    }
}
