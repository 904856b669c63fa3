// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use futures_util::future::BoxFuture;
use log::{debug, warn};
use tokio::sync::mpsc;

use crate::{
    error::{Internal, Result},
    storage::Storage,
};

use super::{AuthPayload, Event, Identity, Observer};

/// Session observer that hands every change to the persistence worker.
pub(crate) struct Persister {
    tx: mpsc::UnboundedSender<Event>,
}

impl Observer for Persister {
    fn session_changed(&self, event: &Event) {
        if let Err(e) = self.tx.send(event.clone()).map_err(Internal::from) {
            warn!("The session change could not be queued for storage: {}", e);
        }
    }
}

/// Creates the persistence worker and the observer that feeds it. The worker
/// finishes once every [`Persister`] has been dropped and the queue drained.
pub(crate) fn channel<'worker, Token, UserInfo>(
    token: Token,
    user_info: UserInfo,
) -> (BoxFuture<'worker, Result<()>>, Persister)
where
    Token: Storage<String> + 'worker,
    UserInfo: Storage<Identity> + 'worker,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let worker = async move { run(token, user_info, rx).await };
    (Box::pin(worker), Persister { tx })
}

async fn run<Token, UserInfo>(
    mut token: Token,
    mut user_info: UserInfo,
    mut rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()>
where
    Token: Storage<String>,
    UserInfo: Storage<Identity>,
{
    while let Some(event) = rx.recv().await {
        if let Err(e) = apply(&mut token, &mut user_info, &event).await {
            warn!("We could not persist the session change: {}", e);
        }
    }
    Ok(())
}

async fn apply<Token, UserInfo>(token: &mut Token, user_info: &mut UserInfo, event: &Event) -> Result<()>
where
    Token: Storage<String>,
    UserInfo: Storage<Identity>,
{
    match *event {
        Event::Established {
            ref credential,
            ref identity,
        } => {
            debug!("Saving session credential");
            token.update(&credential.expose().to_owned()).await?;
            match identity.as_ref() {
                Some(identity) => user_info.update(identity).await?,
                None => user_info.clear().await?,
            }
        }
        Event::Cleared => {
            debug!("Erasing stored session");
            token.clear().await?;
            user_info.clear().await?;
        }
    }
    Ok(())
}

/// Reads a previously saved session, if any. Unreadable entries are treated
/// as absent.
pub(crate) async fn restore<Token, UserInfo>(
    token: &mut Token,
    user_info: &mut UserInfo,
) -> Option<AuthPayload>
where
    Token: Storage<String>,
    UserInfo: Storage<Identity>,
{
    let stored_token = match token.get().await {
        Ok(Some(stored)) => stored,
        Ok(None) => return None,
        Err(e) => {
            warn!("The stored credential could not be read: {}", e);
            return None;
        }
    };

    let identity = user_info.get().await.unwrap_or_else(|e| {
        warn!("The stored user information could not be read: {}", e);
        None
    });
    Some(AuthPayload::new(Some(stored_token), identity))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        error::Result,
        session::{credential::tests::token_expiring_at, Manager, PrincipalId},
        storage::Memory,
    };

    use super::*;

    fn identity() -> Identity {
        Identity {
            id: Some(PrincipalId::Number(7)),
            name: "Aiko".to_owned(),
            role: Some("member".to_owned()),
        }
    }

    #[tokio::test]
    async fn writes_and_erases_both_keys() -> Result<()> {
        let mut token = Memory::<String>::new();
        let mut user_info = Memory::<Identity>::new();
        let (worker, persister) = channel(token.clone(), user_info.clone());

        let mut session = Manager::new();
        session.subscribe(Arc::new(persister));
        session.set_session(AuthPayload::new(Some("a.b.c".to_owned()), Some(identity())));
        drop(session);
        worker.await?;

        assert_eq!(token.get().await?.as_deref(), Some("a.b.c"));
        assert_eq!(user_info.get().await?, Some(identity()));

        let (worker, persister) = channel(token.clone(), user_info.clone());
        let mut session = Manager::new();
        session.subscribe(Arc::new(persister));
        session.clear_session();
        session.clear_session();
        drop(session);
        worker.await?;

        assert_eq!(token.get().await?, None);
        assert_eq!(user_info.get().await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn restores_saved_session() -> Result<()> {
        let stored = token_expiring_at(u64::from(u32::MAX));
        let mut token = Memory::with(stored.clone());
        let mut user_info = Memory::with(identity());

        let payload = restore(&mut token, &mut user_info).await;
        let (restored_token, restored_identity) =
            payload.map(AuthPayload::into_parts).unwrap_or_default();
        assert_eq!(restored_token, Some(stored));
        assert_eq!(restored_identity, Some(identity()));
        Ok(())
    }

    #[tokio::test]
    async fn nothing_to_restore_without_token() {
        let mut token = Memory::<String>::new();
        let mut user_info = Memory::with(identity());
        assert!(restore(&mut token, &mut user_info).await.is_none());
    }
}
