// src/presentation/http/controllers/notifications.rs
use crate::application::{
    ApplicationResult,
    dto::{NotificationFeed, NotificationFeedDto},
    error::ApplicationError,
    notifications::Subscription,
    ports::rate_limit::RouteClass,
};
use crate::domain::notification::NotificationId;
use crate::presentation::http::{
    error::{HttpResult, IntoHttpResult},
    extractors::{DeferredQuery, RequestContext, query_params},
    response::ApiResponse,
    state::HttpState,
};
use axum::{
    Extension, Json,
    extract::Path,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{self, Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use tokio::sync::mpsc;

#[derive(Debug, Deserialize)]
pub struct FeedParams {
    #[serde(default)]
    pub recent: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadResult {
    pub changed: u64,
}

/// Rate limit on the api class, then resolve the bearer to its subject.
async fn recipient(state: &HttpState, context: &RequestContext) -> ApplicationResult<String> {
    state
        .services
        .rate_limiter()
        .check(RouteClass::Api, context.caller())
        .await?;
    state
        .services
        .authorization_guard()
        .authenticate(context.bearer())
        .await
}

pub async fn list_notifications(
    Extension(state): Extension<HttpState>,
    context: RequestContext,
    query: DeferredQuery<FeedParams>,
) -> HttpResult<Json<ApiResponse<NotificationFeedDto>>> {
    let recipient_id = recipient(&state, &context).await.into_http()?;
    let params = query_params(query).into_http()?;
    let feed = state
        .services
        .notifications
        .feed(&recipient_id)
        .await
        .into_http()?;

    Ok(ApiResponse::ok(
        "Notifications",
        NotificationFeedDto::from_feed(&feed, params.recent),
    ))
}

pub async fn mark_notification_read(
    Extension(state): Extension<HttpState>,
    context: RequestContext,
    Path(id): Path<String>,
) -> HttpResult<Json<ApiResponse<MarkReadResult>>> {
    let recipient_id = recipient(&state, &context).await.into_http()?;
    let id: NotificationId = id
        .parse()
        .map_err(ApplicationError::from)
        .into_http()?;
    let changed = state
        .services
        .notifications
        .mark_read_for(&recipient_id, id)
        .await
        .into_http()?;

    Ok(ApiResponse::ok(
        "Notification marked as read",
        MarkReadResult {
            changed: u64::from(changed),
        },
    ))
}

pub async fn mark_all_notifications_read(
    Extension(state): Extension<HttpState>,
    context: RequestContext,
) -> HttpResult<Json<ApiResponse<MarkReadResult>>> {
    let recipient_id = recipient(&state, &context).await.into_http()?;
    let changed = state
        .services
        .notifications
        .mark_all_read(&recipient_id)
        .await
        .into_http()?;

    Ok(ApiResponse::ok(
        "Notifications marked as read",
        MarkReadResult { changed },
    ))
}

fn feed_event(feed: &NotificationFeed) -> Event {
    let dto = NotificationFeedDto::from_feed(feed, None);
    Event::default()
        .event("notifications")
        .json_data(&dto)
        .unwrap_or_else(|_| Event::default().event("notifications").data("{}"))
}

/// Snapshots from `rx` that differ from the one sent before them. The
/// subscription is subscribed before the initial read, so a change landing in
/// between arrives both in `initial` and as the first update; that repeat is
/// dropped here. `guard` rides along until the stream is dropped.
fn changed_feeds<G>(
    rx: mpsc::UnboundedReceiver<NotificationFeed>,
    guard: G,
    initial: NotificationFeed,
) -> impl Stream<Item = NotificationFeed> {
    stream::unfold((rx, guard, initial), |(mut rx, guard, last)| async move {
        loop {
            let feed = rx.recv().await?;
            if feed != last {
                return Some((feed.clone(), (rx, guard, feed)));
            }
        }
    })
}

/// Live feed over Server-Sent Events. The first event is the current list;
/// every later event is the full list after a change. The subscription
/// lives inside the stream and is released when the client goes away.
pub async fn stream_notifications(
    Extension(state): Extension<HttpState>,
    context: RequestContext,
) -> HttpResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let recipient_id = recipient(&state, &context).await.into_http()?;
    let notifications = &state.services.notifications;

    let (tx, rx) = mpsc::unbounded_channel::<NotificationFeed>();
    let subscription: Subscription = notifications.subscribe(&recipient_id, move |feed| {
        let _ = tx.send(feed.clone());
    });
    let current = notifications.feed(&recipient_id).await.into_http()?;

    let initial = stream::once(std::future::ready(feed_event(&current)));
    let events = initial
        .chain(changed_feeds(rx, subscription, current).map(|feed| feed_event(&feed)))
        .map(Ok::<_, Infallible>);

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}
