use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// Exécute `operation` jusqu'à `max_attempts` fois, avec une pause fixe entre deux essais.
///
/// L'opération reçoit le numéro de tentative (à partir de 1). Une erreur pour
/// laquelle `should_retry` renvoie `false` est retournée immédiatement, sans
/// nouvelle tentative. Après la dernière tentative, la dernière erreur est renvoyée.
pub async fn retry_with_delay<T, E, F, Fut, P>(
    max_attempts: u32,
    delay: Duration,
    should_retry: P,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    E: Display,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < max_attempts && should_retry(&err) => {
                warn!(
                    "⚠️  Tentative {}/{} échouée: {} (nouvel essai dans {:?})",
                    attempt, max_attempts, err, delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
