use rocket_aero::components::rocket::{
    AxialPosition, BodyTube, ComponentId, ComponentKind, FinSet, FlightConfiguration, Rocket,
    RocketComponent, Transition, TransitionShape, TubeFinSet,
};
use rocket_aero::components::FlightConditions;
use rocket_aero::utils::deg_to_rad;

pub fn tube(name: &str, radius: f64, length: f64) -> RocketComponent {
    RocketComponent::new(name, ComponentKind::BodyTube(BodyTube::new(radius, length)))
}

pub fn ogive_nose(length: f64, radius: f64) -> RocketComponent {
    RocketComponent::new(
        "nose",
        ComponentKind::NoseCone(Transition::nose_cone(TransitionShape::Ogive, length, radius)),
    )
}

/// Root chord 8 cm, tip chord 4 cm, sweep 3 cm, height 6 cm
pub fn trapezoidal_fins(count: usize) -> RocketComponent {
    RocketComponent::new(
        "fins",
        ComponentKind::FinSet(FinSet::trapezoidal(count, 0.08, 0.04, 0.03, 0.06)),
    )
    .at(AxialPosition::Bottom(0.0))
}

/// Conditions at the configuration's reference length.
pub fn conditions_at(configuration: &FlightConfiguration, mach: f64, aoa_deg: f64) -> FlightConditions {
    let mut conditions = FlightConditions::new(configuration.reference_length());
    conditions.set_mach(mach);
    conditions.set_aoa(deg_to_rad(aoa_deg));
    conditions
}

pub struct PlainTube {
    pub configuration: FlightConfiguration,
    pub tube: ComponentId,
}

/// A lone 4 cm body tube, 50 cm long.
pub fn plain_tube() -> PlainTube {
    let mut rocket = Rocket::new("plain tube");
    let stage = rocket
        .add(rocket.root(), RocketComponent::new("stage", ComponentKind::AxialStage))
        .unwrap();
    let tube = rocket.add(stage, tube("tube", 0.02, 0.5)).unwrap();
    PlainTube {
        configuration: FlightConfiguration::new(rocket),
        tube,
    }
}

pub struct FinnedRocket {
    pub configuration: FlightConfiguration,
    pub stage: ComponentId,
    pub nose: ComponentId,
    pub body: ComponentId,
    pub fins: ComponentId,
}

/// Ogive nose, body tube and four trapezoidal fins at the aft end.
pub fn finned_rocket() -> FinnedRocket {
    let mut rocket = Rocket::new("finned");
    let stage = rocket
        .add(rocket.root(), RocketComponent::new("sustainer", ComponentKind::AxialStage))
        .unwrap();
    let nose = rocket.add(stage, ogive_nose(0.1, 0.0125)).unwrap();
    let body = rocket.add(stage, tube("body", 0.0125, 0.4)).unwrap();
    let fins = rocket.add(body, trapezoidal_fins(4)).unwrap();
    FinnedRocket {
        configuration: FlightConfiguration::new(rocket),
        stage,
        nose,
        body,
        fins,
    }
}

pub struct SteppedTubes {
    pub configuration: FlightConfiguration,
    pub upper: ComponentId,
    pub lower: ComponentId,
}

/// Nose on a 2.0 cm radius tube followed by a 2.5 cm radius tube.
pub fn stepped_tubes() -> SteppedTubes {
    let mut rocket = Rocket::new("stepped");
    let stage = rocket
        .add(rocket.root(), RocketComponent::new("stage", ComponentKind::AxialStage))
        .unwrap();
    rocket.add(stage, ogive_nose(0.1, 0.02)).unwrap();
    let upper = rocket.add(stage, tube("upper", 0.020, 0.3)).unwrap();
    let lower = rocket.add(stage, tube("lower", 0.025, 0.3)).unwrap();
    SteppedTubes {
        configuration: FlightConfiguration::new(rocket),
        upper,
        lower,
    }
}

pub struct TwoStage {
    pub configuration: FlightConfiguration,
    pub sustainer: ComponentId,
    pub nose: ComponentId,
    pub sustainer_body: ComponentId,
    pub booster: ComponentId,
    pub booster_body: ComponentId,
    pub booster_fins: ComponentId,
}

/// Finless sustainer above a finned booster whose drag is overridden as a whole.
pub fn two_stage(booster_cd: f64) -> TwoStage {
    let mut rocket = Rocket::new("two stage");
    let sustainer = rocket
        .add(rocket.root(), RocketComponent::new("sustainer", ComponentKind::AxialStage))
        .unwrap();
    let nose = rocket.add(sustainer, ogive_nose(0.1, 0.0125)).unwrap();
    let sustainer_body = rocket.add(sustainer, tube("sustainer body", 0.0125, 0.3)).unwrap();
    let booster = rocket
        .add(
            rocket.root(),
            RocketComponent::new("booster", ComponentKind::AxialStage).with_override(booster_cd, true),
        )
        .unwrap();
    let booster_body = rocket.add(booster, tube("booster body", 0.0125, 0.25)).unwrap();
    let booster_fins = rocket.add(booster_body, trapezoidal_fins(3)).unwrap();
    TwoStage {
        configuration: FlightConfiguration::new(rocket),
        sustainer,
        nose,
        sustainer_body,
        booster,
        booster_body,
        booster_fins,
    }
}

pub struct TubeFinnedRocket {
    pub configuration: FlightConfiguration,
    pub body: ComponentId,
    pub tubes: ComponentId,
}

/// Ogive nose and body tube with six touching 8 cm tube fins at the aft end.
pub fn tube_finned_rocket() -> TubeFinnedRocket {
    let mut rocket = Rocket::new("tube finned");
    let stage = rocket
        .add(rocket.root(), RocketComponent::new("sustainer", ComponentKind::AxialStage))
        .unwrap();
    rocket.add(stage, ogive_nose(0.1, 0.0125)).unwrap();
    let body = rocket.add(stage, tube("body", 0.0125, 0.4)).unwrap();
    let tubes = rocket
        .add(
            body,
            RocketComponent::new("tube fins", ComponentKind::TubeFinSet(TubeFinSet::new(6, 0.08)))
                .at(AxialPosition::Bottom(0.0)),
        )
        .unwrap();
    TubeFinnedRocket {
        configuration: FlightConfiguration::new(rocket),
        body,
        tubes,
    }
}
