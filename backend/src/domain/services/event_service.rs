//! Event lifecycle: admin-owned event records plus per-user attendance.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::error::Error;
use crate::domain::event::{Event, EventDraft, EventId, EventPatch, Visibility};
use crate::domain::guard::{require_owner, require_role, require_verified};
use crate::domain::ports::{EventPersistenceError, EventRepository, UserRepository};
use crate::domain::user::{Role, User, UserId};

use super::{display_name, resolve_users};

fn map_event_error(error: EventPersistenceError) -> Error {
    match error {
        EventPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("event repository unavailable: {message}"))
        }
        EventPersistenceError::Query { message } => {
            Error::internal(format!("event repository error: {message}"))
        }
    }
}

/// Event enriched with its creator's display name.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventView {
    pub id: EventId,
    pub created_by: UserId,
    pub created_by_name: String,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub visibility: Visibility,
    pub attendees: Vec<UserId>,
}

impl EventView {
    fn project(event: Event, resolved: &HashMap<UserId, User>) -> Self {
        let created_by_name = display_name(resolved, event.created_by);
        Self {
            id: event.id,
            created_by: event.created_by,
            created_by_name,
            title: event.title,
            description: event.description,
            date: event.date,
            location: event.location,
            image: event.image,
            visibility: event.visibility,
            attendees: event.attendees,
        }
    }

    fn created_by(event: Event, creator: &User) -> Self {
        Self {
            id: event.id,
            created_by: event.created_by,
            created_by_name: creator.name.clone(),
            title: event.title,
            description: event.description,
            date: event.date,
            location: event.location,
            image: event.image,
            visibility: event.visibility,
            attendees: event.attendees,
        }
    }
}

/// Event service backing `/api/events`.
#[derive(Clone)]
pub struct EventService {
    events: Arc<dyn EventRepository>,
    users: Arc<dyn UserRepository>,
}

impl EventService {
    /// Create the service over its collaborating ports.
    pub fn new(events: Arc<dyn EventRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { events, users }
    }

    /// Create an event owned by the acting Institute Admin.
    pub async fn create(&self, actor: &User, draft: EventDraft) -> Result<EventView, Error> {
        require_verified(actor)?;
        require_role(actor, Role::InstituteAdmin)?;
        if draft.title.trim().is_empty() {
            return Err(Error::invalid_request("Event title is required"));
        }

        let event = Event::new(actor.id, draft);
        self.events.insert(&event).await.map_err(map_event_error)?;
        Ok(EventView::created_by(event, actor))
    }

    /// Upcoming events visible to the actor, date ascending.
    ///
    /// Students only see events published to everyone; every other role sees
    /// the full calendar.
    pub async fn list(&self, actor: &User) -> Result<Vec<EventView>, Error> {
        require_verified(actor)?;
        let events = self.events.list().await.map_err(map_event_error)?;
        let visible: Vec<_> = events
            .into_iter()
            .filter(|event| event.visibility.visible_to(actor.role))
            .collect();
        let resolved =
            resolve_users(&self.users, visible.iter().map(|event| event.created_by)).await?;
        Ok(visible
            .into_iter()
            .map(|event| EventView::project(event, &resolved))
            .collect())
    }

    /// Partially update an event. Only the creating admin may update.
    pub async fn update(
        &self,
        actor: &User,
        id: EventId,
        patch: EventPatch,
    ) -> Result<EventView, Error> {
        require_verified(actor)?;
        let mut event = self.find(id).await?;
        require_owner(actor, event.created_by, "Not authorized")?;

        event.apply(patch);
        self.events.update(&event).await.map_err(map_event_error)?;
        let resolved = resolve_users(&self.users, [event.created_by]).await?;
        Ok(EventView::project(event, &resolved))
    }

    /// Delete an event. Only the creating admin may delete.
    pub async fn delete(&self, actor: &User, id: EventId) -> Result<(), Error> {
        require_verified(actor)?;
        let event = self.find(id).await?;
        require_owner(actor, event.created_by, "Not authorized")?;
        if !self.events.delete(id).await.map_err(map_event_error)? {
            return Err(Error::not_found("Event not found"));
        }
        Ok(())
    }

    /// Register the actor for an event.
    ///
    /// The duplicate check is read-first; the mutation is an atomic set-add,
    /// so a concurrent duplicate degrades to a no-op rather than a double
    /// registration.
    pub async fn register(&self, actor: &User, id: EventId) -> Result<EventView, Error> {
        require_verified(actor)?;
        let mut event = self.find(id).await?;
        if event.is_attending(actor.id) {
            return Err(Error::invalid_request("Already registered for this event"));
        }
        if !self
            .events
            .add_attendee(id, actor.id)
            .await
            .map_err(map_event_error)?
        {
            return Err(Error::not_found("Event not found"));
        }

        event.register(actor.id);
        let resolved = resolve_users(&self.users, [event.created_by]).await?;
        Ok(EventView::project(event, &resolved))
    }

    /// Withdraw the actor's registration.
    pub async fn unregister(&self, actor: &User, id: EventId) -> Result<EventView, Error> {
        require_verified(actor)?;
        let mut event = self.find(id).await?;
        if !event.is_attending(actor.id) {
            return Err(Error::invalid_request(
                "You are not registered for this event",
            ));
        }
        if !self
            .events
            .remove_attendee(id, actor.id)
            .await
            .map_err(map_event_error)?
        {
            return Err(Error::not_found("Event not found"));
        }

        event.unregister(actor.id);
        let resolved = resolve_users(&self.users, [event.created_by]).await?;
        Ok(EventView::project(event, &resolved))
    }

    async fn find(&self, id: EventId) -> Result<Event, Error> {
        self.events
            .find_by_id(id)
            .await
            .map_err(map_event_error)?
            .ok_or_else(|| Error::not_found("Event not found"))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::error::ErrorCode;
    use crate::domain::ports::{InMemoryEventRepository, InMemoryUserRepository};
    use crate::domain::user::Profile;
    use chrono::Duration;

    fn harness() -> (EventService, Arc<InMemoryUserRepository>) {
        let users = Arc::new(InMemoryUserRepository::new());
        let service = EventService::new(Arc::new(InMemoryEventRepository::new()), users.clone());
        (service, users)
    }

    async fn seeded(users: &InMemoryUserRepository, name: &str, role: Role, verified: bool) -> User {
        let mut user = User::register(
            name,
            format!("{}@example.edu", name.to_lowercase()),
            "$argon2id$fake",
            role,
            Profile::default(),
        );
        user.is_verified = verified;
        users.insert(&user).await.expect("seed user");
        user
    }

    fn draft(title: &str, visibility: Option<Visibility>) -> EventDraft {
        EventDraft {
            title: title.into(),
            description: "Annual reunion".into(),
            date: Utc::now() + Duration::days(7),
            location: "Main hall".into(),
            image: None,
            visibility,
        }
    }

    #[tokio::test]
    async fn creation_is_admin_only_and_defaults_to_alumni_only() {
        let (service, users) = harness();
        let alumni = seeded(&users, "Ada", Role::Alumni, true).await;
        let admin = seeded(&users, "Root", Role::InstituteAdmin, true).await;

        let err = service
            .create(&alumni, draft("Homecoming", None))
            .await
            .expect_err("alumni cannot create events");
        assert_eq!(err.code(), ErrorCode::Forbidden);
        assert_eq!(err.message(), "Not authorized as an Institute Admin");

        let view = service
            .create(&admin, draft("Homecoming", None))
            .await
            .expect("admin creates");
        assert_eq!(view.visibility, Visibility::AlumniOnly);
        assert_eq!(view.created_by_name, "Root");
    }

    #[tokio::test]
    async fn students_only_see_events_open_to_all() {
        let (service, users) = harness();
        let admin = seeded(&users, "Root", Role::InstituteAdmin, true).await;
        let student = seeded(&users, "Sam", Role::Student, true).await;
        let alumni = seeded(&users, "Ada", Role::Alumni, true).await;

        service
            .create(&admin, draft("Reunion", Some(Visibility::AlumniOnly)))
            .await
            .expect("create");
        service
            .create(&admin, draft("Open day", Some(Visibility::All)))
            .await
            .expect("create");

        let student_view = service.list(&student).await.expect("student list");
        assert_eq!(student_view.len(), 1);
        assert_eq!(student_view[0].title, "Open day");

        let alumni_view = service.list(&alumni).await.expect("alumni list");
        assert_eq!(alumni_view.len(), 2);
    }

    #[tokio::test]
    async fn update_is_restricted_to_the_creating_admin() {
        let (service, users) = harness();
        let creator = seeded(&users, "Root", Role::InstituteAdmin, true).await;
        let other_admin = seeded(&users, "Boss", Role::InstituteAdmin, true).await;
        let event = service
            .create(&creator, draft("Homecoming", None))
            .await
            .expect("create");

        let err = service
            .update(
                &other_admin,
                event.id,
                EventPatch {
                    title: Some("Hijacked".into()),
                    ..EventPatch::default()
                },
            )
            .await
            .expect_err("other admin cannot update");
        assert_eq!(err.code(), ErrorCode::Unauthorized);

        let updated = service
            .update(
                &creator,
                event.id,
                EventPatch {
                    location: Some("Auditorium".into()),
                    ..EventPatch::default()
                },
            )
            .await
            .expect("creator updates");
        assert_eq!(updated.location, "Auditorium");
        assert_eq!(updated.title, "Homecoming");
    }

    #[tokio::test]
    async fn register_and_unregister_enforce_attendance_preconditions() {
        let (service, users) = harness();
        let admin = seeded(&users, "Root", Role::InstituteAdmin, true).await;
        let alumni = seeded(&users, "Ada", Role::Alumni, true).await;
        let event = service
            .create(&admin, draft("Homecoming", None))
            .await
            .expect("create");

        let err = service
            .unregister(&alumni, event.id)
            .await
            .expect_err("not yet registered");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), "You are not registered for this event");

        let registered = service
            .register(&alumni, event.id)
            .await
            .expect("registration succeeds");
        assert_eq!(registered.attendees, vec![alumni.id]);

        let err = service
            .register(&alumni, event.id)
            .await
            .expect_err("double registration rejected");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), "Already registered for this event");

        let withdrawn = service
            .unregister(&alumni, event.id)
            .await
            .expect("withdrawal succeeds");
        assert!(withdrawn.attendees.is_empty());
    }

    #[tokio::test]
    async fn delete_removes_the_event_for_its_creator_only() {
        let (service, users) = harness();
        let creator = seeded(&users, "Root", Role::InstituteAdmin, true).await;
        let other_admin = seeded(&users, "Boss", Role::InstituteAdmin, true).await;
        let event = service
            .create(&creator, draft("Homecoming", None))
            .await
            .expect("create");

        let err = service
            .delete(&other_admin, event.id)
            .await
            .expect_err("other admin cannot delete");
        assert_eq!(err.code(), ErrorCode::Unauthorized);

        service
            .delete(&creator, event.id)
            .await
            .expect("creator deletes");
        let err = service
            .delete(&creator, event.id)
            .await
            .expect_err("missing event reported");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), "Event not found");
    }
}
