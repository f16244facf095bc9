//! The scripted questionnaire.
//!
//! A fixed, linear sequence of steps. Each step shows one bot message and collects one answer;
//! answers are recorded by step but never influence which step comes next. Reaching the terminal
//! step stores everything collected against the registration.
//!
//! ```text
//! Q1 → Q2 → … → Q7 → APPROVAL → Q8 → … → Q12 → FINAL_MSG → END
//! ```

pub mod session;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db::models::{pets::PetCreateDBRequest, questionnaires::QuestionnaireCreateDBRequest};
use crate::types::RegistrationId;

/// First message of every dialog, shown before Q1
pub const GREETING: &str = "Olá! Vamos conhecer um pouco sobre você e seus pets.\n\nSão perguntas rápidas, é só escolher uma opção ou digitar a resposta.";

/// A questionnaire step, declared in sequence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
pub enum Step {
    Q1,
    Q2,
    Q3,
    Q4,
    Q5,
    Q6,
    Q7,
    #[serde(rename = "APPROVAL")]
    Approval,
    Q8,
    Q9,
    Q10,
    Q11,
    Q12,
    #[serde(rename = "FINAL_MSG")]
    FinalMsg,
    #[serde(rename = "END")]
    End,
}

pub const SEQUENCE: [Step; 15] = [
    Step::Q1,
    Step::Q2,
    Step::Q3,
    Step::Q4,
    Step::Q5,
    Step::Q6,
    Step::Q7,
    Step::Approval,
    Step::Q8,
    Step::Q9,
    Step::Q10,
    Step::Q11,
    Step::Q12,
    Step::FinalMsg,
    Step::End,
];

/// A fixed answer button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub value: &'static str,
    pub label: &'static str,
}

const fn choice(value: &'static str, label: &'static str) -> Choice {
    Choice { value, label }
}

/// How a step collects its answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Presentation {
    /// Pick one of the step's choices
    Options,
    /// Free text, non-empty once trimmed
    Input,
    /// A single continue button
    Auto,
    /// Nothing to answer; the client moves on to the payment page
    EndFlow,
    /// Nothing is shown
    #[serde(rename = "none")]
    Hidden,
}

/// The bot message and answer controls for one step
#[derive(Debug, Clone, Copy)]
pub struct StepScript {
    pub text: &'static str,
    pub presentation: Presentation,
    pub choices: &'static [Choice],
}

/// A validated answer: the stored value and what the user's chat bubble shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accepted {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AnswerError {
    #[error("the questionnaire is already finished")]
    Finished,
    #[error("not one of this step's options")]
    InvalidChoice,
    #[error("answer is empty")]
    EmptyInput,
}

const PET_COUNT: &[Choice] = &[choice("1", "1"), choice("2", "2"), choice("3+", "3 ou mais")];
const PET_TYPE: &[Choice] = &[
    choice("cachorro", "Cachorro"),
    choice("gato", "Gato"),
    choice("ambos", "Cachorro e gato"),
    choice("outro", "Outro"),
];
const FEEDING: &[Choice] = &[
    choice("racao_adequada", "Ração adequada"),
    choice("racao_possivel", "Ração quando possível"),
    choice("restos", "Restos de comida"),
    choice("alterna", "Alterna entre ração e restos"),
];
const FEEDS_PER_DAY: &[Choice] = &[
    choice("1", "Uma vez"),
    choice("2", "Duas vezes"),
    choice("3+", "Três ou mais"),
    choice("livre", "Comida sempre à disposição"),
];
const YES: Choice = choice("sim", "Sim");
const NO: Choice = choice("nao", "Não");
const YES_NO: &[Choice] = &[YES, NO];
const CASTRATED: &[Choice] = &[YES, NO, choice("alguns", "Alguns sim, outros não")];
const VACCINATED: &[Choice] = &[YES, NO, choice("nao_sei", "Não sei informar")];
const CONTINUE: &[Choice] = &[choice("continuar", "Continuar")];
const AGE_BRACKET: &[Choice] = &[
    choice("filhote", "Filhote (até 1 ano)"),
    choice("adulto", "Adulto (1 a 7 anos)"),
    choice("idoso", "Idoso (mais de 7 anos)"),
];

impl Step {
    /// Position in [`SEQUENCE`]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The step after this one; END is its own successor
    pub fn next(self) -> Step {
        SEQUENCE.get(self.index() + 1).copied().unwrap_or(Step::End)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Step::Q1 => "Q1",
            Step::Q2 => "Q2",
            Step::Q3 => "Q3",
            Step::Q4 => "Q4",
            Step::Q5 => "Q5",
            Step::Q6 => "Q6",
            Step::Q7 => "Q7",
            Step::Approval => "APPROVAL",
            Step::Q8 => "Q8",
            Step::Q9 => "Q9",
            Step::Q10 => "Q10",
            Step::Q11 => "Q11",
            Step::Q12 => "Q12",
            Step::FinalMsg => "FINAL_MSG",
            Step::End => "END",
        }
    }

    pub fn script(self) -> StepScript {
        use Presentation::*;

        let (text, presentation, choices): (&'static str, Presentation, &'static [Choice]) = match self {
            Step::Q1 => ("Quantos animais de estimação vivem com você atualmente?", Options, PET_COUNT),
            Step::Q2 => ("Que tipo de animal é o seu pet principal?", Options, PET_TYPE),
            Step::Q3 => ("Atualmente, como é a alimentação principal do seu pet?", Options, FEEDING),
            Step::Q4 => ("Quantas vezes por dia o seu pet é alimentado?", Options, FEEDS_PER_DAY),
            Step::Q5 => ("Seus pets já foram castrados?", Options, CASTRATED),
            Step::Q6 => (
                "A vacina antirrábica é essencial para a saúde e o controle de doenças. Seus animais estão vacinados contra a raiva?",
                Options,
                VACCINATED,
            ),
            Step::Q7 => ("Você tem alguma clínica veterinária perto de casa?", Options, YES_NO),
            Step::Approval => (
                "Obrigado! Suas respostas até aqui foram registradas.\n\nAgora queremos conhecer melhor o seu pet principal.",
                Auto,
                CONTINUE,
            ),
            Step::Q8 => ("Qual é o nome do seu pet?", Input, &[]),
            Step::Q9 => ("Qual é a raça dele? Se não souber, pode responder \"SRD\".", Input, &[]),
            Step::Q10 => ("Em qual faixa de idade ele está?", Options, AGE_BRACKET),
            Step::Q11 => (
                "Qual clínica ou serviço veterinário você costuma usar? Se nenhum, responda \"nenhum\".",
                Input,
                &[],
            ),
            Step::Q12 => (
                "Quer deixar algum comentário ou sugestão sobre o cuidado com pets na sua região?",
                Input,
                &[],
            ),
            Step::FinalMsg => (
                "🤍 Obrigado por participar!\n\nSuas respostas ajudam a entender as necessidades dos tutores e dos seus pets.\n\n\
                 Na próxima página você pode, se quiser, fazer uma doação voluntária para ONGs de proteção animal. \
                 A doação é opcional e não muda nada na sua participação.",
                EndFlow,
                &[],
            ),
            Step::End => ("", Hidden, &[]),
        };

        StepScript {
            text,
            presentation,
            choices,
        }
    }

    /// Validate a raw answer against this step's presentation
    pub fn accept(self, raw: &str) -> Result<Accepted, AnswerError> {
        let script = self.script();
        match script.presentation {
            Presentation::Options | Presentation::Auto => script
                .choices
                .iter()
                .find(|c| c.value == raw)
                .map(|c| Accepted {
                    value: c.value.to_string(),
                    label: c.label.to_string(),
                })
                .ok_or(AnswerError::InvalidChoice),
            Presentation::Input => {
                let text = raw.trim();
                if text.is_empty() {
                    Err(AnswerError::EmptyInput)
                } else {
                    Ok(Accepted {
                        value: text.to_string(),
                        label: text.to_string(),
                    })
                }
            }
            Presentation::EndFlow | Presentation::Hidden => Err(AnswerError::Finished),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// "1", "2", "3+" → 1, 2, 3
fn pet_count(value: &str) -> Option<i32> {
    value.trim_end_matches('+').parse().ok()
}

/// The full answer map as stored in the `answers` column
pub fn answers_json(answers: &BTreeMap<Step, String>) -> serde_json::Value {
    answers
        .iter()
        .map(|(step, value)| (step.as_str().to_string(), serde_json::Value::String(value.clone())))
        .collect::<serde_json::Map<_, _>>()
        .into()
}

/// Row stored when the questionnaire completes
pub fn to_questionnaire_request(registration_id: RegistrationId, answers: &BTreeMap<Step, String>) -> QuestionnaireCreateDBRequest {
    let get = |step: Step| answers.get(&step).cloned();

    QuestionnaireCreateDBRequest {
        registration_id,
        quantidade_pets: answers.get(&Step::Q1).and_then(|v| pet_count(v)),
        alimentacao: get(Step::Q3),
        frequencia_alimentacao: get(Step::Q4),
        castrado: get(Step::Q5),
        vacinas: get(Step::Q6),
        answers: answers_json(answers),
        ..Default::default()
    }
}

/// Pet described in Q8-Q10, typed by Q2. `None` unless the name, breed and age were all answered.
pub fn to_pet_request(registration_id: RegistrationId, answers: &BTreeMap<Step, String>) -> Option<PetCreateDBRequest> {
    Some(PetCreateDBRequest {
        registration_id,
        name: answers.get(&Step::Q8)?.clone(),
        breed: answers.get(&Step::Q9)?.clone(),
        age: answers.get(&Step::Q10)?.clone(),
        pet_type: answers.get(&Step::Q2).cloned().unwrap_or_else(|| "outro".to_string()),
    })
}
