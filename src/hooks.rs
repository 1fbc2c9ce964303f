use crate::components::SessionHandle;
use crate::interactions::{StatusArea, StatusLine};
use std::rc::Rc;
use yew::prelude::*;

/// The session provided by the nearest `SessionProvider`, if any.
#[hook]
pub fn use_session() -> Option<SessionHandle> {
    use_context::<SessionHandle>()
}

/// [`StatusArea`] that feeds a component's state.
pub struct CallbackStatusArea {
    on_status: Callback<StatusLine>,
}

impl CallbackStatusArea {
    pub fn new(on_status: Callback<StatusLine>) -> Self {
        Self { on_status }
    }
}

impl StatusArea for CallbackStatusArea {
    fn show(&self, status: StatusLine) {
        self.on_status.emit(status);
    }
}

/// Current status line plus a stable [`StatusArea`] that updates it.
#[hook]
pub fn use_status_area() -> (StatusLine, Rc<dyn StatusArea>) {
    let status = use_state(StatusLine::default);
    let area = {
        // The setter stays valid across renders, so the area is built once.
        let setter = status.setter();
        use_memo((), move |_| CallbackStatusArea::new(Callback::from(move |line| setter.set(line))))
    };
    let area: Rc<dyn StatusArea> = area;
    ((*status).clone(), area)
}
