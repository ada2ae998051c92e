//! Two labels and a button, the third row starting hidden.

use humble_core::{
    ButtonState, LabelState, ObserverId, ReconcileError, Reconciler, ReconcilerOptions,
    StateCell, ViewComponent, ViewNode,
};
use humble_ui::{DefaultViewFactory, StackHost};

use crate::Transcript;

pub struct Screen {
    label1: StateCell<LabelState>,
    label3: StateCell<LabelState>,
    button2: StateCell<ButtonState>,
}

impl Screen {
    pub fn new(observer: ObserverId) -> Self {
        Self {
            label1: StateCell::new(observer, LabelState::new("Label 1")),
            label3: StateCell::new(observer, LabelState::new("Label 3").hidden(true)),
            button2: StateCell::new(observer, ButtonState::new("Button")),
        }
    }

    pub fn change_value_1(&self) {
        self.label1
            .update(|state| state.text = Some("Label 1 updated".into()));
    }

    pub fn change_value_2(&self) {
        self.button2
            .update(|state| state.title = Some("Label 2 updated".into()));
    }

    pub fn toggle_hidden_label(&self) {
        self.label3.update(|state| state.is_hidden = !state.is_hidden);
    }
}

impl ViewComponent for Screen {
    fn render(&self) -> Vec<ViewNode> {
        vec![
            ViewNode::label(&self.label1),
            ViewNode::label(&self.label3),
            ViewNode::button(&self.button2),
        ]
    }
}

pub type ScreenReconciler = Reconciler<Screen, StackHost, DefaultViewFactory>;

pub fn mount(options: ReconcilerOptions) -> Result<ScreenReconciler, ReconcileError> {
    let observer = ObserverId::new();
    let reconciler = Reconciler::with_options(
        observer,
        Screen::new(observer),
        StackHost::vertical().with_spacing(10),
        DefaultViewFactory::new(),
        options,
    );
    let report = reconciler.start()?;
    log::info!("screen mounted: {} views", report.inserted);
    Ok(reconciler)
}

pub fn run(options: ReconcilerOptions) -> Result<Transcript, ReconcileError> {
    let reconciler = mount(options)?;
    let screen = reconciler.component();
    let mut transcript = Transcript::default();
    transcript.record("mount", &reconciler);

    screen.change_value_1();
    transcript.record("change value 1", &reconciler);

    screen.change_value_2();
    transcript.record("change value 2", &reconciler);

    screen.toggle_hidden_label();
    transcript.record("show hidden label", &reconciler);

    Ok(transcript)
}
