pub(crate) trait AnswerGenerator: Send {
    fn generate(&self) -> String;
}

impl<F> AnswerGenerator for F
where
    F: Fn() -> String + Send,
{
    fn generate(&self) -> String {
        self()
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct PlaceholderAnswer(pub(crate) &'static str);

impl AnswerGenerator for PlaceholderAnswer {
    fn generate(&self) -> String {
        self.0.to_string()
    }
}

pub(crate) struct AnswerGenerators {
    pub(crate) scene: Box<dyn AnswerGenerator>,
    pub(crate) video: Box<dyn AnswerGenerator>,
    pub(crate) new_scene: Box<dyn AnswerGenerator>,
}

impl Default for AnswerGenerators {
    fn default() -> Self {
        Self {
            scene: Box::new(PlaceholderAnswer("Scene answer placeholder")),
            video: Box::new(PlaceholderAnswer("Video answer placeholder")),
            new_scene: Box::new(PlaceholderAnswer("New scene answer placeholder")),
        }
    }
}
