use crate::{state::RosterState, view::ViewChange};
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::{Stream, StreamExt, stream};
use std::convert::Infallible;
use tokio_stream::wrappers::{BroadcastStream, errors::BroadcastStreamRecvError};

/// Tells the page which regions to re-fetch.
pub async fn sse_feed(
    State(state): State<RosterState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.subscribe_to_view_changes();

    let stream = BroadcastStream::new(rx).flat_map(|received| {
        stream::iter(changes_to_announce(received).into_iter().map(|change| {
            //browsers drop events with no data, so the name goes in both
            Ok(Event::default()
                .event(change.event_name())
                .data(change.event_name()))
        }))
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// A lagging subscriber missed some changes, so every region gets re-fetched.
fn changes_to_announce(
    received: Result<ViewChange, BroadcastStreamRecvError>,
) -> Vec<ViewChange> {
    match received {
        Ok(change) => vec![change],
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            warn!(skipped, "SSE subscriber lagged behind view changes");
            ViewChange::ALL.to_vec()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn changes_pass_straight_through() {
        assert_eq!(
            changes_to_announce(Ok(ViewChange::Message)),
            vec![ViewChange::Message]
        );
    }

    #[test]
    fn lagging_reloads_every_region() {
        assert_eq!(
            changes_to_announce(Err(BroadcastStreamRecvError::Lagged(3))),
            vec![ViewChange::Roster, ViewChange::Message, ViewChange::Confirm]
        );
    }
}
