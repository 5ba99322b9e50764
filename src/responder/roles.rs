/// Persona the user can ask the assistant to adopt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    QaExpert,
    SoftwareArchitect,
    BusinessAnalyst,
    SeniorDeveloper,
    TechnicalConsultant,
}

const ROLE_PHRASES: &[(Role, &[&str])] = &[
    (
        Role::QaExpert,
        &[
            "act as a qa expert",
            "act as a qa engineer",
            "act as a tester",
            "act as a testing expert",
            "act as a test case expert",
            "behave like a qa",
            "behave like a tester",
            "you are a qa expert",
            "you are a qa engineer",
            "quality assurance expert",
            "actua como experto en qa",
            "actua como ingeniero qa",
            "actua como tester",
            "actua como experto en testing",
            "actua como experto en casos de prueba",
            "comportate como qa",
            "comportate como tester",
            "eres un experto qa",
            "eres un ingeniero qa",
            "experto en quality assurance",
        ],
    ),
    (
        Role::SoftwareArchitect,
        &[
            "act as an architect",
            "act as a software architect",
            "behave like an architect",
            "you are a software architect",
            "actua como arquitecto",
            "comportate como arquitecto",
            "eres un arquitecto de software",
        ],
    ),
    (
        Role::BusinessAnalyst,
        &[
            "act as an analyst",
            "act as a business analyst",
            "behave like an analyst",
            "you are a business analyst",
            "actua como analista",
            "comportate como analista",
            "eres un analista de negocio",
        ],
    ),
    (
        Role::SeniorDeveloper,
        &[
            "act as a developer",
            "act as a senior developer",
            "act as a senior programmer",
            "behave like a developer",
            "you are a senior developer",
            "actua como desarrollador",
            "actua como programador senior",
            "comportate como desarrollador",
            "eres un desarrollador senior",
        ],
    ),
    (
        Role::TechnicalConsultant,
        &[
            "act as a consultant",
            "act as a technical consultant",
            "behave like a consultant",
            "you are a technical consultant",
            "actua como consultor",
            "comportate como consultor",
            "eres un consultor tecnico",
            "eres un consultor técnico",
        ],
    ),
];

impl Role {
    /// First role whose trigger phrase appears in `message`
    pub fn detect(message: &str) -> Option<Self> {
        let lower = message.to_lowercase();
        // Accented and plain spellings both match
        let lower = lower.replace('ú', "u").replace('ó', "o");
        ROLE_PHRASES
            .iter()
            .find(|(_, phrases)| phrases.iter().any(|p| lower.contains(p)))
            .map(|(role, _)| *role)
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::QaExpert => "QA and test case expert",
            Self::SoftwareArchitect => "software architect",
            Self::BusinessAnalyst => "business analyst",
            Self::SeniorDeveloper => "senior developer",
            Self::TechnicalConsultant => "technical consultant",
        }
    }

    /// Experience block injected into the prompt
    pub fn context(self) -> &'static str {
        match self {
            Self::QaExpert => {
                "As a QA and test case expert with more than 10 years of experience, you have:

- Specialization in testing methodologies (manual and automated)
- Experience designing exhaustive test cases
- Deep knowledge of ISTQB, Agile Testing and industry practice
- Skill at spotting edge scenarios and critical cases
- Experience documenting and tracking defects
- Knowledge of tools such as Jira, TestRail and Selenium
- A focus on quality, test coverage and risk analysis

Your goal is to ensure the highest software quality through rigorous testing."
            }
            Self::SoftwareArchitect => {
                "As a senior software architect with broad experience, you have:

- Design of scalable and maintainable architectures
- Deep knowledge of design and architecture patterns
- Experience with cloud technologies and microservices
- Skill at evaluating and recommending technologies
- A focus on performance, security and scalability
- Experience with technical documentation and architecture diagrams

Your goal is to design robust and efficient technical solutions."
            }
            Self::BusinessAnalyst => {
                "As an experienced business analyst, you have:

- Skill at understanding complex business processes
- Experience gathering and analyzing requirements
- Knowledge of process modeling and documentation
- Skill at translating business needs into technical requirements
- Experience in stakeholder management
- A focus on process optimization and ROI

Your goal is to maximize the business value of solutions."
            }
            Self::SeniorDeveloper => {
                "As a senior developer with broad experience, you have:

- Command of multiple languages and frameworks
- Experience with clean code
- Deep knowledge of algorithms and data structures
- Skill at reviewing code and mentoring juniors
- Experience in debugging and optimization
- A focus on maintainability and performance

Your goal is to write high-quality, efficient code."
            }
            Self::TechnicalConsultant => {
                "As an experienced technical consultant, you have:

- Broad knowledge of technologies and methodologies
- Skill at analyzing complex problems and proposing solutions
- Experience across industries and projects
- A focus on industry standards
- Skill at explaining technical concepts to different audiences
- Experience in technical audits and strategic recommendations

Your goal is to provide expert guidance and optimized solutions."
            }
        }
    }
}
