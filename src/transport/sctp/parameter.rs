use std::net::{Ipv4Addr, Ipv6Addr};

use log::trace;
use nom::bytes::complete::take;
use nom::number::complete::{be_u16, be_u32};
use nom::IResult;
use rusticata_macros::{align32, newtype_enum};

use crate::utils::take_array;
use crate::TraceError;

/// SCTP chunk parameter type
#[derive(Clone, Copy, Default, Eq, PartialEq)]
pub struct ParameterType(pub u16);

newtype_enum! {
impl debug ParameterType {
    HEARTBEAT_INFO = 1,
    IPV4_SENDER = 5,
    IPV6_SENDER = 6,
    STATE_COOKIE = 7,
    UNRECOGNIZED_PARAMETER = 8,
    COOKIE_LIFESPAN_INCREMENT = 9,
    HOSTNAME_ADDRESS = 11,
    SUPPORTED_ADDRESS_TYPES = 12,
}
}

/// Common header of all chunk parameters
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ParameterHeader {
    pub parameter_type: ParameterType,
    /// Length of the parameter, header included, padding excluded
    pub length: u16,
}

impl ParameterHeader {
    pub const SIZE: usize = 4;
}

pub fn parse_parameter_header(i: &[u8]) -> IResult<&[u8], ParameterHeader, TraceError> {
    let (i, parameter_type) = be_u16(i)?;
    let (i, length) = be_u16(i)?;
    let header = ParameterHeader {
        parameter_type: ParameterType(parameter_type),
        length,
    };
    Ok((i, header))
}

/// A chunk parameter
#[derive(Clone, Debug, PartialEq)]
pub enum Parameter {
    Ipv4Sender(Ipv4SenderParameter),
    Ipv6Sender(Ipv6SenderParameter),
    CookieLifespanIncrement(CookieLifespanIncrementParameter),
    HeartbeatInfo(HeartbeatInfoParameter),
    Unknown(UnknownParameter),
}

impl Parameter {
    pub fn header(&self) -> &ParameterHeader {
        match self {
            Parameter::Ipv4Sender(p) => &p.header,
            Parameter::Ipv6Sender(p) => &p.header,
            Parameter::CookieLifespanIncrement(p) => &p.header,
            Parameter::HeartbeatInfo(p) => &p.header,
            Parameter::Unknown(p) => &p.header,
        }
    }

    #[inline]
    pub fn parameter_type(&self) -> ParameterType {
        self.header().parameter_type
    }
}

/// IPv4 address of the sending endpoint (INIT, INIT ACK)
#[derive(Clone, Debug, PartialEq)]
pub struct Ipv4SenderParameter {
    pub header: ParameterHeader,
    pub address: Ipv4Addr,
}

/// IPv6 address of the sending endpoint (INIT, INIT ACK)
#[derive(Clone, Debug, PartialEq)]
pub struct Ipv6SenderParameter {
    pub header: ParameterHeader,
    pub address: Ipv6Addr,
}

/// Suggested cookie life-span increment, in milliseconds (INIT)
#[derive(Clone, Debug, PartialEq)]
pub struct CookieLifespanIncrementParameter {
    pub header: ParameterHeader,
    pub increment: u32,
}

/// Sender-specific heartbeat information (HEARTBEAT, HEARTBEAT ACK)
#[derive(Clone, Debug, PartialEq)]
pub struct HeartbeatInfoParameter {
    pub header: ParameterHeader,
    pub info: Vec<u8>,
}

/// Parameter with a type not recognized by the enclosing chunk
#[derive(Clone, Debug, PartialEq)]
pub struct UnknownParameter {
    pub header: ParameterHeader,
    pub data: Vec<u8>,
}

pub(crate) trait SctpParameterParser: Sized {
    /// Minimum declared length, header included
    const MIN_LEN: usize;
    /// Parameter type handled by this parser (`None`: any type)
    const TYPE: Option<ParameterType>;

    // caller function must have tested parameter type and length
    fn inner_parse(header: ParameterHeader, value: &[u8]) -> IResult<&[u8], Self, TraceError>;
}

impl SctpParameterParser for Ipv4SenderParameter {
    const MIN_LEN: usize = 8;
    const TYPE: Option<ParameterType> = Some(ParameterType::IPV4_SENDER);

    fn inner_parse(header: ParameterHeader, i: &[u8]) -> IResult<&[u8], Self, TraceError> {
        let (i, address) = take_array::<4>(i)?;
        let address = Ipv4Addr::from(address);
        Ok((i, Ipv4SenderParameter { header, address }))
    }
}

impl SctpParameterParser for Ipv6SenderParameter {
    const MIN_LEN: usize = 20;
    const TYPE: Option<ParameterType> = Some(ParameterType::IPV6_SENDER);

    fn inner_parse(header: ParameterHeader, i: &[u8]) -> IResult<&[u8], Self, TraceError> {
        let (i, address) = take_array::<16>(i)?;
        let address = Ipv6Addr::from(address);
        Ok((i, Ipv6SenderParameter { header, address }))
    }
}

impl SctpParameterParser for CookieLifespanIncrementParameter {
    const MIN_LEN: usize = 8;
    const TYPE: Option<ParameterType> = Some(ParameterType::COOKIE_LIFESPAN_INCREMENT);

    fn inner_parse(header: ParameterHeader, i: &[u8]) -> IResult<&[u8], Self, TraceError> {
        let (i, increment) = be_u32(i)?;
        Ok((i, CookieLifespanIncrementParameter { header, increment }))
    }
}

impl SctpParameterParser for HeartbeatInfoParameter {
    const MIN_LEN: usize = 4;
    const TYPE: Option<ParameterType> = Some(ParameterType::HEARTBEAT_INFO);

    fn inner_parse(header: ParameterHeader, i: &[u8]) -> IResult<&[u8], Self, TraceError> {
        let info = i.to_vec();
        Ok((&[], HeartbeatInfoParameter { header, info }))
    }
}

impl SctpParameterParser for UnknownParameter {
    const MIN_LEN: usize = 4;
    const TYPE: Option<ParameterType> = None;

    fn inner_parse(header: ParameterHeader, i: &[u8]) -> IResult<&[u8], Self, TraceError> {
        let data = i.to_vec();
        Ok((&[], UnknownParameter { header, data }))
    }
}

/// Parse one parameter with parser `P`, padding excluded
///
/// The parameter type is checked against `P::TYPE` (`TypeMismatch`), and the
/// declared length against `P::MIN_LEN` and the input (`InsufficientLength`).
pub(crate) fn parameter_parser<P: SctpParameterParser>(
    i: &[u8],
) -> IResult<&[u8], P, TraceError> {
    let (i, header) = parse_parameter_header(i)?;
    if let Some(expected) = P::TYPE {
        if header.parameter_type != expected {
            return Err(nom::Err::Error(TraceError::TypeMismatch));
        }
    }
    let length = usize::from(header.length);
    if length < P::MIN_LEN {
        return Err(nom::Err::Error(TraceError::InsufficientLength));
    }
    let (i, value) = take(length - ParameterHeader::SIZE)(i)?;
    let (_, parameter) = P::inner_parse(header, value)?;
    Ok((i, parameter))
}

/// Parse a heartbeat information parameter
pub fn parse_heartbeat_info(i: &[u8]) -> IResult<&[u8], HeartbeatInfoParameter, TraceError> {
    parameter_parser::<HeartbeatInfoParameter>(i)
}

/// Parse a parameter of any type as `Parameter::Unknown`
pub fn parse_unknown_parameter(i: &[u8]) -> IResult<&[u8], Parameter, TraceError> {
    let (i, parameter) = parameter_parser::<UnknownParameter>(i)?;
    Ok((i, Parameter::Unknown(parameter)))
}

/// Parser for a single parameter, selected by a chunk type
///
/// The input holds exactly one parameter, without padding.
pub type ParameterParser = fn(&[u8]) -> IResult<&[u8], Parameter, TraceError>;

/// Parameter parser for INIT and INIT ACK chunks
pub fn parse_init_parameter(i: &[u8]) -> IResult<&[u8], Parameter, TraceError> {
    let (_, header) = parse_parameter_header(i)?;
    match header.parameter_type {
        ParameterType::IPV4_SENDER => {
            let (i, p) = parameter_parser::<Ipv4SenderParameter>(i)?;
            Ok((i, Parameter::Ipv4Sender(p)))
        }
        ParameterType::IPV6_SENDER => {
            let (i, p) = parameter_parser::<Ipv6SenderParameter>(i)?;
            Ok((i, Parameter::Ipv6Sender(p)))
        }
        ParameterType::COOKIE_LIFESPAN_INCREMENT => {
            let (i, p) = parameter_parser::<CookieLifespanIncrementParameter>(i)?;
            Ok((i, Parameter::CookieLifespanIncrement(p)))
        }
        _ => {
            trace!("unknown INIT parameter type {:?}", header.parameter_type);
            parse_unknown_parameter(i)
        }
    }
}

/// Parameter parser for ERROR chunks
///
/// No error cause is decoded yet: every parameter is kept as `Unknown`.
pub fn parse_error_parameter(i: &[u8]) -> IResult<&[u8], Parameter, TraceError> {
    parse_unknown_parameter(i)
}

/// Parse a sequence of parameters filling the input
///
/// Each parameter is bounded by its declared length before `parse_parameter`
/// is called. Padding up to the next 4-byte boundary is skipped; the last
/// parameter may come without padding.
pub fn parse_parameters(
    i: &[u8],
    parse_parameter: ParameterParser,
) -> IResult<&[u8], Vec<Parameter>, TraceError> {
    let mut parameters = Vec::new();
    let mut i = i;
    while !i.is_empty() {
        let (_, header) = parse_parameter_header(i)?;
        let length = usize::from(header.length);
        if length < ParameterHeader::SIZE || i.len() < length {
            return Err(nom::Err::Error(TraceError::InsufficientLength));
        }
        let (_, parameter) = parse_parameter(&i[..length])?;
        let next = align32!(length).min(i.len());
        i = &i[next..];
        parameters.push(parameter);
    }
    Ok((i, parameters))
}
