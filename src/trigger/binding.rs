/// Boxed event handler. Handlers may inspect or mutate the event and may fail.
pub type Handler<'a, E, Err> = Box<dyn FnMut(&mut E) -> Result<(), Err> + 'a>;

/// Chain a consumer handler with an internal one.
///
/// The returned handler always runs `theirs` first, then `ours`. Errors are not caught here: an
/// error from `theirs` is returned as-is and `ours` does not run for that event.
pub fn compose<'a, E, Err>(
    theirs: Option<Handler<'a, E, Err>>,
    ours: Option<Handler<'a, E, Err>>,
) -> Handler<'a, E, Err>
where
    E: 'a,
    Err: 'a,
{
    let mut theirs = theirs;
    let mut ours = ours;
    Box::new(move |event: &mut E| {
        if let Some(handler) = theirs.as_mut() {
            handler(event)?;
        }
        if let Some(handler) = ours.as_mut() {
            handler(event)?;
        }
        Ok(())
    })
}

#[cfg(test)]
#[path = "../../tests/unit/trigger/binding.rs"]
mod tests;
