//! The ArchiMate element catalogue.
//!
//! Every [`ElementType`] knows its [`Layer`], its [`Aspect`], the PlantUML
//! ArchiMate library macro that draws it, and its name in the Archi exchange
//! format. The catalogue is declared once in a table so the four views can
//! never drift apart.

use std::fmt;

use crate::layer::Layer;

/// The structural aspect of an element type.
///
/// The relationship matrix is expressed over aspects rather than over the
/// full cross product of element types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aspect {
    /// Things that perform behavior: actors, components, nodes.
    ActiveStructure,
    /// Processes, functions, events, services and similar.
    Behavior,
    /// Things that are acted upon: objects, data, artifacts.
    PassiveStructure,
    /// Stakeholders, goals, requirements and the rest of the motivation layer.
    Motivation,
    /// Elements that aggregate other concepts, such as products and plateaus.
    Composite,
}

macro_rules! element_types {
    ($($variant:ident => ($layer:ident, $aspect:ident, $macro_name:literal)),+ $(,)?) => {
        /// A canonical ArchiMate element type.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum ElementType {
            $($variant),+
        }

        impl ElementType {
            /// Every element type, in catalogue order.
            pub const ALL: &'static [ElementType] = &[$(ElementType::$variant),+];

            /// Returns the layer this element type belongs to.
            pub fn layer(self) -> Layer {
                match self {
                    $(ElementType::$variant => Layer::$layer),+
                }
            }

            /// Returns the structural aspect of this element type.
            pub fn aspect(self) -> Aspect {
                match self {
                    $(ElementType::$variant => Aspect::$aspect),+
                }
            }

            /// Returns the PlantUML ArchiMate library macro, e.g. `Business_Actor`.
            pub fn plantuml_macro(self) -> &'static str {
                match self {
                    $(ElementType::$variant => $macro_name),+
                }
            }

            /// Returns the Archi exchange-format type name, e.g. `BusinessActor`.
            pub fn exchange_name(self) -> &'static str {
                match self {
                    $(ElementType::$variant => stringify!($variant)),+
                }
            }
        }
    };
}

element_types! {
    BusinessActor => (Business, ActiveStructure, "Business_Actor"),
    BusinessRole => (Business, ActiveStructure, "Business_Role"),
    BusinessCollaboration => (Business, ActiveStructure, "Business_Collaboration"),
    BusinessInterface => (Business, ActiveStructure, "Business_Interface"),
    BusinessProcess => (Business, Behavior, "Business_Process"),
    BusinessFunction => (Business, Behavior, "Business_Function"),
    BusinessInteraction => (Business, Behavior, "Business_Interaction"),
    BusinessEvent => (Business, Behavior, "Business_Event"),
    BusinessService => (Business, Behavior, "Business_Service"),
    BusinessObject => (Business, PassiveStructure, "Business_Object"),
    Contract => (Business, PassiveStructure, "Business_Contract"),
    Representation => (Business, PassiveStructure, "Business_Representation"),
    Product => (Business, Composite, "Business_Product"),
    Location => (Business, Composite, "Other_Location"),

    ApplicationComponent => (Application, ActiveStructure, "Application_Component"),
    ApplicationCollaboration => (Application, ActiveStructure, "Application_Collaboration"),
    ApplicationInterface => (Application, ActiveStructure, "Application_Interface"),
    ApplicationFunction => (Application, Behavior, "Application_Function"),
    ApplicationInteraction => (Application, Behavior, "Application_Interaction"),
    ApplicationProcess => (Application, Behavior, "Application_Process"),
    ApplicationEvent => (Application, Behavior, "Application_Event"),
    ApplicationService => (Application, Behavior, "Application_Service"),
    DataObject => (Application, PassiveStructure, "Application_DataObject"),

    Node => (Technology, ActiveStructure, "Technology_Node"),
    Device => (Technology, ActiveStructure, "Technology_Device"),
    SystemSoftware => (Technology, ActiveStructure, "Technology_SystemSoftware"),
    TechnologyCollaboration => (Technology, ActiveStructure, "Technology_Collaboration"),
    TechnologyInterface => (Technology, ActiveStructure, "Technology_Interface"),
    Path => (Technology, ActiveStructure, "Technology_Path"),
    CommunicationNetwork => (Technology, ActiveStructure, "Technology_CommunicationNetwork"),
    TechnologyFunction => (Technology, Behavior, "Technology_Function"),
    TechnologyProcess => (Technology, Behavior, "Technology_Process"),
    TechnologyInteraction => (Technology, Behavior, "Technology_Interaction"),
    TechnologyEvent => (Technology, Behavior, "Technology_Event"),
    TechnologyService => (Technology, Behavior, "Technology_Service"),
    Artifact => (Technology, PassiveStructure, "Technology_Artifact"),

    Equipment => (Physical, ActiveStructure, "Physical_Equipment"),
    Facility => (Physical, ActiveStructure, "Physical_Facility"),
    DistributionNetwork => (Physical, ActiveStructure, "Physical_DistributionNetwork"),
    Material => (Physical, PassiveStructure, "Physical_Material"),

    Stakeholder => (Motivation, Motivation, "Motivation_Stakeholder"),
    Driver => (Motivation, Motivation, "Motivation_Driver"),
    Assessment => (Motivation, Motivation, "Motivation_Assessment"),
    Goal => (Motivation, Motivation, "Motivation_Goal"),
    Outcome => (Motivation, Motivation, "Motivation_Outcome"),
    Principle => (Motivation, Motivation, "Motivation_Principle"),
    Requirement => (Motivation, Motivation, "Motivation_Requirement"),
    Constraint => (Motivation, Motivation, "Motivation_Constraint"),
    Meaning => (Motivation, Motivation, "Motivation_Meaning"),
    Value => (Motivation, Motivation, "Motivation_Value"),

    Resource => (Strategy, Composite, "Strategy_Resource"),
    Capability => (Strategy, Behavior, "Strategy_Capability"),
    CourseOfAction => (Strategy, Behavior, "Strategy_CourseOfAction"),
    ValueStream => (Strategy, Behavior, "Strategy_ValueStream"),

    WorkPackage => (Implementation, Behavior, "Implementation_WorkPackage"),
    Deliverable => (Implementation, PassiveStructure, "Implementation_Deliverable"),
    ImplementationEvent => (Implementation, Behavior, "Implementation_Event"),
    Plateau => (Implementation, Composite, "Implementation_Plateau"),
    Gap => (Implementation, Composite, "Implementation_Gap"),
}

impl ElementType {
    /// Returns the sprite stereotype the ArchiMate library attaches to this
    /// type, e.g. `business-actor`.
    pub fn sprite_stereotype(self) -> String {
        self.plantuml_macro().to_ascii_lowercase().replace('_', "-")
    }

    /// Returns `true` if elements of this type may be declared in `layer`.
    pub fn is_valid_for(self, layer: Layer) -> bool {
        self.layer() == layer
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.plantuml_macro())
    }
}
