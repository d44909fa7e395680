// df-core/src/units.rs

use uom::si::f64::{
    Angle as UomAngle, Area as UomArea, Length as UomLength, MassDensity as UomMassDensity,
    Pressure as UomPressure, Velocity as UomVelocity, VolumeRate as UomVolumeRate,
};

// Public canonical unit types (SI, f64)
pub type Angle = UomAngle;
pub type Area = UomArea;
pub type Density = UomMassDensity;
pub type Length = UomLength;
pub type Pressure = UomPressure;
pub type Velocity = UomVelocity;
pub type VolumeRate = UomVolumeRate;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn mm(v: f64) -> Length {
    use uom::si::length::millimeter;
    Length::new::<millimeter>(v)
}

#[inline]
pub fn m2(v: f64) -> Area {
    use uom::si::area::square_meter;
    Area::new::<square_meter>(v)
}

#[inline]
pub fn deg(v: f64) -> Angle {
    use uom::si::angle::degree;
    Angle::new::<degree>(v)
}

#[inline]
pub fn kg_per_m3(v: f64) -> Density {
    use uom::si::mass_density::kilogram_per_cubic_meter;
    Density::new::<kilogram_per_cubic_meter>(v)
}

/// Volume flow from cubic meters per hour.
#[inline]
pub fn m3h(v: f64) -> VolumeRate {
    use uom::si::volume_rate::cubic_meter_per_second;
    VolumeRate::new::<cubic_meter_per_second>(v / SECONDS_PER_HOUR)
}

/// Volume flow expressed in cubic meters per hour.
#[inline]
pub fn to_m3h(q: VolumeRate) -> f64 {
    use uom::si::volume_rate::cubic_meter_per_second;
    q.get::<cubic_meter_per_second>() * SECONDS_PER_HOUR
}

#[inline]
pub fn to_mm(l: Length) -> f64 {
    use uom::si::length::millimeter;
    l.get::<millimeter>()
}

#[inline]
pub fn to_degrees(a: Angle) -> f64 {
    use uom::si::angle::degree;
    a.get::<degree>()
}

pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// Air velocity in m/s for a flow in m³/h through an area in m².
#[inline]
pub fn velocity_mps(flow_m3h: f64, area_m2: f64) -> f64 {
    flow_m3h / (SECONDS_PER_HOUR * area_m2)
}

/// Conversions to and from the host application's internal units.
///
/// The host stores lengths in feet, volume flow in cubic feet per second,
/// pressure in kg/(ft·s²) and angles in radians.
pub mod host {
    use super::*;

    /// Pascals per internal pressure unit (1 kg/(ft·s²) = 1/0.3048 Pa).
    pub const PA_PER_INTERNAL_PRESSURE: f64 = 1.0 / 0.3048;

    #[inline]
    pub fn length(v: f64) -> Length {
        use uom::si::length::foot;
        Length::new::<foot>(v)
    }

    #[inline]
    pub fn length_to_internal(l: Length) -> f64 {
        use uom::si::length::foot;
        l.get::<foot>()
    }

    #[inline]
    pub fn flow(v: f64) -> VolumeRate {
        use uom::si::volume_rate::cubic_foot_per_second;
        VolumeRate::new::<cubic_foot_per_second>(v)
    }

    #[inline]
    pub fn flow_to_internal(q: VolumeRate) -> f64 {
        use uom::si::volume_rate::cubic_foot_per_second;
        q.get::<cubic_foot_per_second>()
    }

    #[inline]
    pub fn pressure(v: f64) -> Pressure {
        pa(v * PA_PER_INTERNAL_PRESSURE)
    }

    #[inline]
    pub fn pressure_to_internal(p: Pressure) -> f64 {
        use uom::si::pressure::pascal;
        p.get::<pascal>() / PA_PER_INTERNAL_PRESSURE
    }

    #[inline]
    pub fn angle(v: f64) -> Angle {
        use uom::si::angle::radian;
        Angle::new::<radian>(v)
    }

    #[inline]
    pub fn angle_to_internal(a: Angle) -> f64 {
        use uom::si::angle::radian;
        a.get::<radian>()
    }
}

pub mod constants {
    /// Standard air density used for dynamic pressure, kg/m³.
    pub const AIR_DENSITY_KG_M3: f64 = 1.2;
}
